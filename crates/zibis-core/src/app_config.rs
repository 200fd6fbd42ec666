use std::net::SocketAddr;

use crate::settings::StorePaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Realtime database base URL, without a trailing slash.
    pub database_url: String,
    /// Database secret or ID token, sent as `?auth=`.
    pub database_secret: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub pricing_path: String,
    pub catalog_path: String,
    pub store_timeout_secs: u64,
    pub sync_interval_secs: u64,
    /// Bearer tokens accepted on admin routes.
    pub admin_keys: Vec<String>,
}

impl AppConfig {
    #[must_use]
    pub fn store_paths(&self) -> StorePaths {
        StorePaths::new(&self.pricing_path, &self.catalog_path)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field(
                "database_secret",
                &self.database_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("pricing_path", &self.pricing_path)
            .field("catalog_path", &self.catalog_path)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("sync_interval_secs", &self.sync_interval_secs)
            .field(
                "admin_keys",
                &format_args!("[{} redacted]", self.admin_keys.len()),
            )
            .finish()
    }
}
