use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Serialize;
use zibis_core::{estimate, Estimate, SelectionState, SelectionSummary};

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct EstimateResponse {
    estimate: Estimate,
    summary: SelectionSummary,
    summary_text: String,
    /// The selection as priced, after quantity clamping and the area lock.
    selection: SelectionState,
    area_editable: bool,
    visible: bool,
}

/// Prices a selection against the live snapshot. Stale product references
/// are skipped; an empty store prices against the seed catalog.
pub(super) async fn create_estimate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SelectionState>, JsonRejection>,
) -> Result<Json<ApiResponse<EstimateResponse>>, ApiError> {
    let Json(mut selection) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let snapshot = state.live.current();
    let catalog = snapshot.catalog.clone().or_seed();
    let area_editable = selection.sync_area_lock(&snapshot.pricing);
    let result = estimate(&selection, &snapshot.pricing, &catalog);
    let summary = SelectionSummary::describe(&selection, &catalog);

    Ok(ApiResponse::new(
        EstimateResponse {
            visible: !result.is_empty(),
            summary_text: summary.to_string(),
            estimate: result,
            summary,
            selection,
            area_editable,
        },
        req_id.0,
    ))
}
