use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;
use zibis_core::{AppConfig, Environment};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token settings for the admin routes.
#[derive(Clone)]
pub struct AuthState {
    admin_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("admin_keys", &self.admin_keys.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl AuthState {
    /// Builds auth from `ZIBIS_ADMIN_KEYS` as loaded into [`AppConfig`].
    /// In development, no keys disables auth for local iteration.
    ///
    /// # Errors
    ///
    /// Returns an error when no keys are configured outside development.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            config.admin_keys.clone(),
            matches!(config.env, Environment::Development),
        )
    }

    /// # Errors
    ///
    /// Returns an error when `keys` is empty and `is_development` is false.
    pub fn new(keys: Vec<String>, is_development: bool) -> anyhow::Result<Self> {
        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "ZIBIS_ADMIN_KEYS not set; admin auth disabled in development environment"
                );
                return Ok(Self {
                    admin_keys: Arc::new(Vec::new()),
                    enabled: false,
                });
            }
            anyhow::bail!(
                "ZIBIS_ADMIN_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            admin_keys: Arc::new(keys),
            enabled: true,
        })
    }

    /// Compares against every key so the match position does not leak timing.
    fn allows(&self, token: &str) -> bool {
        self.admin_keys
            .iter()
            .fold(subtle::Choice::from(0), |found, key| {
                found | key.as_bytes().ct_eq(token.as_bytes())
            })
            .into()
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// An incoming `x-request-id` header is reused; otherwise a new `UUIDv4` is
/// generated. The ID is stored as a [`RequestId`] extension and echoed on
/// the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Bearer token auth on admin routes when enabled.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    match extract_bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => {
            tracing::warn!(path = %req.uri().path(), "admin request rejected");
            (
                StatusCode::UNAUTHORIZED,
                Json(MiddlewareErrorBody {
                    error: MiddlewareError {
                        code: "unauthorized",
                        message: "missing or invalid bearer token",
                    },
                }),
            )
                .into_response()
        }
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
