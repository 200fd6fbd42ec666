use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zibis_core::{
    normalize_pricing, pricing::RawPricing, BillingModes, FieldLocks, PricingConfig, PricingField,
    PricingForm,
};

use crate::middleware::RequestId;

use super::{
    map_json_rejection, map_store_error, publish_write, ApiError, ApiResponse, AppState,
};

/// Pricing with the derived billing modes and input locks.
#[derive(Debug, Serialize)]
pub(super) struct PricingView {
    pricing: PricingConfig,
    billing_modes: BillingModes,
    locks: FieldLocks,
    locked_fields: Vec<String>,
}

impl PricingView {
    fn of(pricing: PricingConfig) -> Self {
        let locks = FieldLocks::from_config(&pricing);
        Self {
            billing_modes: BillingModes::of(&pricing),
            locked_fields: locks
                .locked_fields()
                .into_iter()
                .map(PricingField::path)
                .collect(),
            locks,
            pricing,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FieldEdit {
    pub field: String,
    /// Raw form input; non-digits are stripped and blank clears the field.
    #[serde(default)]
    pub value: String,
}

/// `PATCH /pricing` body: one edit, or an ordered batch saved together.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum PricingEdits {
    Batch { edits: Vec<FieldEdit> },
    Single(FieldEdit),
}

impl PricingEdits {
    fn into_vec(self) -> Vec<FieldEdit> {
        match self {
            Self::Batch { edits } => edits,
            Self::Single(edit) => vec![edit],
        }
    }
}

pub(super) async fn get_pricing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<PricingView>> {
    let pricing = state.live.current().pricing.clone();
    ApiResponse::new(PricingView::of(pricing), req_id.0)
}

/// Replaces the pricing record. Accepts the current or legacy record shape.
pub(super) async fn replace_pricing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<PricingView>>, ApiError> {
    let Json(raw) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;
    if matches!(
        RawPricing::classify(Some(&raw)),
        RawPricing::Absent | RawPricing::Unrecognized
    ) {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "unrecognized pricing record shape",
        ));
    }

    let pricing = normalize_pricing(Some(&raw));
    state
        .live
        .store()
        .save_pricing(&pricing)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    publish_write(&state).await;

    Ok(ApiResponse::new(PricingView::of(pricing), req_id.0))
}

/// Applies form edits to the stored record in order and saves once.
/// Locks are checked per edit; the billing-mode rule only at save time.
pub(super) async fn edit_pricing_field(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<PricingEdits>, JsonRejection>,
) -> Result<Json<ApiResponse<PricingView>>, ApiError> {
    let Json(edits) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;
    let edits = edits.into_vec();
    if edits.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "at least one edit is required",
        ));
    }
    let validation = |e: zibis_core::PricingError| {
        ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
    };
    let fields = edits
        .iter()
        .map(|edit| edit.field.parse::<PricingField>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(validation)?;

    let store = state.live.store();
    let current = store
        .load_pricing()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    let mut form = PricingForm::load(current);
    form.edit_all(
        fields
            .into_iter()
            .zip(edits.iter().map(|edit| edit.value.as_str())),
    )
    .map_err(validation)?;
    let pricing = form.submit().map_err(validation)?;

    store
        .save_pricing(&pricing)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    publish_write(&state).await;

    Ok(ApiResponse::new(PricingView::of(pricing), req_id.0))
}
