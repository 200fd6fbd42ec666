mod catalog;
mod estimate;
mod pricing;
mod settings;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use zibis_store::{LiveSync, StoreError};

use crate::middleware::{request_id, require_bearer_auth, AuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub live: Arc<LiveSync>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
    catalog_items: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "store_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Rule violations become `validation_error`, unreadable settings files
/// `bad_request`, everything else a logged `store_error`.
pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    match error {
        StoreError::Pricing(e) => ApiError::new(request_id, "validation_error", e.to_string()),
        StoreError::Settings(e) => ApiError::new(request_id, "bad_request", e.to_string()),
        other => {
            tracing::error!(error = %other, "store request failed");
            ApiError::new(request_id, "store_error", "realtime database request failed")
        }
    }
}

pub(super) fn map_json_rejection(request_id: String, rejection: &JsonRejection) -> ApiError {
    ApiError::new(request_id, "bad_request", rejection.body_text())
}

/// Publishes an admin write to readers right away; a failed re-read only
/// delays it until the next poll.
pub(super) async fn publish_write(state: &AppState) {
    if let Err(e) = state.live.refresh().await {
        tracing::warn!(error = %e, "refresh after admin write failed");
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn admin_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/admin/pricing",
            put(pricing::replace_pricing).patch(pricing::edit_pricing_field),
        )
        .route(
            "/api/v1/admin/catalog",
            get(catalog::list_stored_catalog).put(catalog::replace_catalog),
        )
        .route(
            "/api/v1/admin/catalog/items/{id}",
            delete(catalog::remove_catalog_item),
        )
        .route(
            "/api/v1/admin/settings/export",
            get(settings::export_settings),
        )
        .route(
            "/api/v1/admin/settings/import",
            post(settings::import_settings),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        ))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/vendors", get(catalog::list_vendors))
        .route("/api/v1/catalog", get(catalog::list_catalog))
        .route("/api/v1/pricing", get(pricing::get_pricing))
        .route("/api/v1/estimate", post(estimate::create_estimate));

    Router::new()
        .merge(public_routes)
        .merge(admin_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.live.refresh().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    store: "ok",
                    catalog_items: state.live.current().catalog.len(),
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        store: "unavailable",
                        catalog_items: state.live.current().catalog.len(),
                    },
                    meta,
                }),
            )
        }
    }
}
