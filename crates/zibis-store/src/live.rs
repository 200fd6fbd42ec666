//! Live snapshot of the store for readers that must always have something
//! to render.
//!
//! A background task re-reads pricing and catalog on an interval and
//! publishes each new snapshot on a `watch` channel. A failed read keeps the
//! previous snapshot. Writers call [`LiveSync::refresh`] to publish their
//! change without waiting for the next tick. Refreshes run one at a time,
//! so a read that started earlier can never replace a later one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Notify};

use crate::error::StoreError;
use crate::store::{StoreSnapshot, ZibisStore};

pub struct LiveSync {
    store: ZibisStore,
    interval: Duration,
    tx: watch::Sender<Arc<StoreSnapshot>>,
    refresh_lock: Mutex<()>,
    shutdown: Arc<Notify>,
}

impl LiveSync {
    /// Performs the first read and returns the sync handle. If the first
    /// read fails the snapshot starts as built-in pricing with an empty
    /// catalog.
    pub async fn start(store: ZibisStore, interval: Duration) -> Self {
        let initial = match store.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "initial store read failed; starting from defaults");
                StoreSnapshot {
                    pricing: zibis_core::PricingConfig::builtin_default(),
                    catalog: zibis_core::Catalog::default(),
                }
            }
        };
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self {
            store,
            interval,
            tx,
            refresh_lock: Mutex::new(()),
            shutdown: Arc::new(Notify::new()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &ZibisStore {
        &self.store
    }

    #[must_use]
    pub fn current(&self) -> Arc<StoreSnapshot> {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.tx.subscribe()
    }

    /// Re-reads the store and publishes the result if it differs. Waits for
    /// any refresh already in flight.
    ///
    /// # Errors
    ///
    /// Returns the read error; the published snapshot is left untouched.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let _guard = self.refresh_lock.lock().await;
        let snapshot = self.store.load_snapshot().await?;
        let changed = self.tx.send_if_modified(|current| {
            if **current == snapshot {
                false
            } else {
                *current = Arc::new(snapshot);
                true
            }
        });
        if changed {
            tracing::debug!("store snapshot updated");
        }
        Ok(())
    }

    /// Spawns the polling loop. It runs until [`LiveSync::stop`] is called.
    pub fn spawn(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(this.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately and `start` already read once.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = this.shutdown.notified() => {
                        tracing::info!("live sync stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = this.refresh().await {
                            tracing::warn!(error = %e, "store refresh failed; keeping previous snapshot");
                        }
                    }
                }
            }
        })
    }

    pub fn stop(&self) {
        self.shutdown.notify_one();
    }
}
