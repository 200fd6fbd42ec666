//! HTTP client for the realtime database REST API.
//!
//! Every node is addressed as `{base}/{path}.json`, authenticated with an
//! optional `auth` query parameter. Reads return `null` for missing nodes,
//! which this client surfaces as `None`.

use std::time::Duration;

use reqwest::{Client, Method, Response, Url};
use serde_json::{json, Map, Value};

use crate::error::StoreError;

/// The `{".sv": "timestamp"}` placeholder the database replaces with its own
/// clock at write time.
#[must_use]
pub fn server_timestamp() -> Value {
    json!({ ".sv": "timestamp" })
}

/// Client for one realtime database instance.
///
/// Use [`RealtimeDbClient::new`] with the configured database URL, or point
/// it at a wiremock server in tests.
#[derive(Clone)]
pub struct RealtimeDbClient {
    client: Client,
    base_url: Url,
    auth: Option<String>,
}

impl std::fmt::Debug for RealtimeDbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeDbClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl RealtimeDbClient {
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StoreError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(
        base_url: &str,
        auth: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("zibis/0.1 (estimate-configurator)")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| StoreError::InvalidUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            auth: auth.map(str::to_owned),
        })
    }

    /// Builds `{base}/{path}.json[?auth=…]`. An empty path addresses the root.
    pub(crate) fn build_url(&self, path: &str) -> Result<Url, StoreError> {
        let path = path.trim_matches('/');
        let mut url = self
            .base_url
            .join(&format!("{path}.json"))
            .map_err(|e| StoreError::InvalidUrl(format!("path '{path}': {e}")))?;
        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }

    /// Reads a node. A missing node is `None`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Http`] on network failure.
    /// - [`StoreError::Status`] on a non-2xx response.
    /// - [`StoreError::Deserialize`] if the body is not JSON.
    pub async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let response = self.send(Method::GET, path, None).await?;
        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
                context: format!("GET {path}"),
                source: e,
            })?;
        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }

    /// Replaces a node.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] on network failure, [`StoreError::Status`] on a
    /// non-2xx response.
    pub async fn set(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        self.send(Method::PUT, path, Some(value)).await?;
        tracing::debug!(path, "node replaced");
        Ok(())
    }

    /// Multi-path update: each key of `updates` is a path relative to `path`,
    /// written atomically.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] on network failure, [`StoreError::Status`] on a
    /// non-2xx response.
    pub async fn update(&self, path: &str, updates: &Map<String, Value>) -> Result<(), StoreError> {
        let body = Value::Object(updates.clone());
        self.send(Method::PATCH, path, Some(&body)).await?;
        tracing::debug!(path, keys = updates.len(), "multi-path update applied");
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, StoreError> {
        let url = self.build_url(path)?;
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        tracing::error!(%method, path, status = status.as_u16(), %message, "database request failed");
        Err(StoreError::Status {
            path: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
