//! Typed reads and writes of the pricing and catalog records.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use zibis_core::{
    normalize_catalog, normalize_pricing, validate_for_save, AppConfig, Catalog, ImportedSettings,
    PricingConfig, SettingsSnapshot, StorePaths,
};

use crate::client::{server_timestamp, RealtimeDbClient};
use crate::error::StoreError;

/// Canonical pricing and catalog, read together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub pricing: PricingConfig,
    pub catalog: Catalog,
}

/// Pricing and catalog access over a [`RealtimeDbClient`].
#[derive(Debug, Clone)]
pub struct ZibisStore {
    client: RealtimeDbClient,
    paths: StorePaths,
}

impl ZibisStore {
    #[must_use]
    pub fn new(client: RealtimeDbClient, paths: StorePaths) -> Self {
        Self { client, paths }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the HTTP client cannot be built from the
    /// configured URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let client = RealtimeDbClient::new(
            &config.database_url,
            config.database_secret.as_deref(),
            config.store_timeout_secs,
        )?;
        Ok(Self::new(client, config.store_paths()))
    }

    #[must_use]
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Reads the pricing record; absent or unrecognized records yield the
    /// built-in default.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the client.
    pub async fn load_pricing(&self) -> Result<PricingConfig, StoreError> {
        let raw = self.client.get(&self.paths.pricing).await?;
        Ok(normalize_pricing(raw.as_ref()))
    }

    /// Reads the catalog items. An empty store yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the client.
    pub async fn load_catalog(&self) -> Result<Catalog, StoreError> {
        let raw = self.client.get(&self.paths.catalog_items).await?;
        Ok(normalize_catalog(raw.as_ref()))
    }

    /// Reads both records concurrently.
    ///
    /// # Errors
    ///
    /// Fails if either read fails.
    pub async fn load_snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let (pricing, catalog) = tokio::try_join!(self.load_pricing(), self.load_catalog())?;
        Ok(StoreSnapshot { pricing, catalog })
    }

    /// Validates and writes the pricing record, stamped with the server time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pricing`] without sending anything when the
    /// billing modes are invalid, or a transport error from the write.
    pub async fn save_pricing(&self, pricing: &PricingConfig) -> Result<(), StoreError> {
        validate_for_save(pricing)?;
        let record = stamped(pricing.to_record());
        self.client.set(&self.paths.pricing, &record).await?;
        tracing::info!(path = %self.paths.pricing, "pricing saved");
        Ok(())
    }

    /// Replaces the whole item map, stamping every item with the server time.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the client.
    pub async fn save_catalog(&self, catalog: &Catalog) -> Result<(), StoreError> {
        self.client
            .set(&self.paths.catalog_items, &stamped_items(catalog))
            .await?;
        tracing::info!(
            path = %self.paths.catalog_items,
            items = catalog.len(),
            "catalog saved"
        );
        Ok(())
    }

    /// Reads both raw records concurrently and bundles them for backup.
    ///
    /// # Errors
    ///
    /// Fails if either read fails.
    pub async fn export_settings(
        &self,
        exported_at: DateTime<Utc>,
    ) -> Result<SettingsSnapshot, StoreError> {
        let (pricing, items) = tokio::try_join!(
            self.client.get(&self.paths.pricing),
            self.client.get(&self.paths.catalog_items)
        )?;
        Ok(SettingsSnapshot::build(
            pricing,
            items,
            self.paths.clone(),
            exported_at,
        ))
    }

    /// Writes imported settings with one atomic multi-path update. Records
    /// are stamped with the server time like any other write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pricing`] without sending anything when the
    /// imported pricing violates the billing-mode rules, or a transport error
    /// from the write.
    pub async fn import_settings(&self, settings: &ImportedSettings) -> Result<(), StoreError> {
        validate_for_save(&settings.pricing)?;
        let mut updates = Map::new();
        updates.insert(
            self.paths.pricing.clone(),
            stamped(settings.pricing_record()),
        );
        updates.insert(
            self.paths.catalog_items.clone(),
            stamped_items(&settings.catalog),
        );
        self.client.update("", &updates).await?;
        tracing::info!(
            items = settings.catalog.len(),
            "settings imported"
        );
        Ok(())
    }
}

/// Sets `updatedAt` on a record to the server write time.
fn stamped(mut record: Value) -> Value {
    if let Some(map) = record.as_object_mut() {
        map.insert("updatedAt".to_string(), server_timestamp());
    }
    record
}

fn stamped_items(catalog: &Catalog) -> Value {
    let items: Map<String, Value> = catalog
        .to_store_items()
        .into_iter()
        .map(|(id, record)| (id, stamped(record)))
        .collect();
    Value::Object(items)
}
