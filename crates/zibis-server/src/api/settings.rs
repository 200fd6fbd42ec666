use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use zibis_core::settings::parse_settings_value;

use crate::middleware::RequestId;

use super::{
    map_json_rejection, map_store_error, publish_write, ApiError, ApiResponse, AppState,
};

#[derive(Debug, Serialize)]
pub(super) struct ImportSummary {
    catalog_items: usize,
}

/// The settings file itself, served as a download.
pub(super) async fn export_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let now = Utc::now();
    let snapshot = state
        .live
        .store()
        .export_settings(now)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let disposition = format!(
        "attachment; filename=\"zibis-settings-{}.json\"",
        now.format("%Y%m%d-%H%M%S")
    );
    let mut response = Json(snapshot).into_response();
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

/// Restores pricing and catalog from a settings file body in one write.
pub(super) async fn import_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<ImportSummary>>, ApiError> {
    let Json(raw) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;
    let settings = parse_settings_value(&raw)
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    state
        .live
        .store()
        .import_settings(&settings)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    publish_write(&state).await;

    Ok(ApiResponse::new(
        ImportSummary {
            catalog_items: settings.catalog.len(),
        },
        req_id.0,
    ))
}
