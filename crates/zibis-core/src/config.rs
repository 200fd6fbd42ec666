use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let database_url = require("ZIBIS_DATABASE_URL")?
        .trim()
        .trim_end_matches('/')
        .to_string();
    if !(database_url.starts_with("https://") || database_url.starts_with("http://")) {
        return Err(invalid("ZIBIS_DATABASE_URL", "must be an http(s) URL".to_string()));
    }
    let database_secret = lookup("ZIBIS_DATABASE_SECRET")
        .ok()
        .filter(|s| !s.is_empty());

    let env = parse_environment(&or_default("ZIBIS_ENV", "development"))?;

    let bind_addr = or_default("ZIBIS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("ZIBIS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("ZIBIS_LOG_LEVEL", "info");

    let store_path = |var: &str, default: &str| parse_store_path(var, &or_default(var, default));
    let pricing_path = store_path("ZIBIS_PRICING_PATH", "pricing")?;
    let catalog_path = store_path("ZIBIS_CATALOG_PATH", "catalog")?;

    let store_timeout_secs = parse_u64("ZIBIS_STORE_TIMEOUT_SECS", "30")?;
    let sync_interval_secs = parse_u64("ZIBIS_SYNC_INTERVAL_SECS", "5")?;

    let admin_keys: Vec<String> = or_default("ZIBIS_ADMIN_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if admin_keys.is_empty() && env != Environment::Development {
        return Err(ConfigError::MissingEnvVar("ZIBIS_ADMIN_KEYS".to_string()));
    }

    Ok(AppConfig {
        database_url,
        database_secret,
        env,
        bind_addr,
        log_level,
        pricing_path,
        catalog_path,
        store_timeout_secs,
        sync_interval_secs,
        admin_keys,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ZIBIS_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

/// Store paths are slash-separated keys; the realtime database forbids `.#$[]`.
fn parse_store_path(var: &str, raw: &str) -> Result<String, ConfigError> {
    let path = raw.trim().trim_matches('/');
    if path.is_empty() || path.contains(['.', '#', '$', '[', ']']) {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("invalid database path {raw:?}"),
        });
    }
    Ok(path.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
