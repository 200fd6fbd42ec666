use thiserror::Error;
use zibis_core::{PricingError, SettingsError};

/// Errors returned by the realtime database client and the typed store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The database answered with a non-2xx status.
    #[error("database returned {status} for {path}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    /// The response body could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid database URL: {0}")]
    InvalidUrl(String),

    /// A pricing write was refused before any request was sent.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
