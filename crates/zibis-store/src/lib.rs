//! Realtime database access for the pricing and catalog records.

mod client;
mod error;
mod live;
mod store;

pub use client::{server_timestamp, RealtimeDbClient};
pub use error::StoreError;
pub use live::LiveSync;
pub use store::{StoreSnapshot, ZibisStore};
