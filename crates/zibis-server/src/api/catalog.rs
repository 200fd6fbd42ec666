use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zibis_core::{normalize_catalog, Category, Product, Vendor};

use crate::middleware::RequestId;

use super::{
    map_json_rejection, map_store_error, publish_write, ApiError, ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
pub(super) struct CatalogQuery {
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct VendorItem {
    id: Vendor,
    label: &'static str,
    categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub(super) struct CatalogSaved {
    items: usize,
}

pub(super) async fn list_vendors(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<VendorItem>>> {
    let data = Vendor::ALL
        .into_iter()
        .map(|vendor| VendorItem {
            id: vendor,
            label: vendor.label(),
            categories: vendor.categories().to_vec(),
        })
        .collect();
    ApiResponse::new(data, req_id.0)
}

/// Customer-facing catalog: the live snapshot, or the seed catalog when the
/// store has no items. `search` wins over `vendor`/`category`.
pub(super) async fn list_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let vendor = query
        .vendor
        .as_deref()
        .map(|raw| {
            Vendor::parse(raw).ok_or_else(|| {
                ApiError::new(
                    req_id.0.clone(),
                    "validation_error",
                    format!("unknown vendor '{raw}'"),
                )
            })
        })
        .transpose()?;
    let category = query
        .category
        .as_deref()
        .map(|raw| {
            Category::parse(raw).ok_or_else(|| {
                ApiError::new(
                    req_id.0.clone(),
                    "validation_error",
                    format!("unknown category '{raw}'"),
                )
            })
        })
        .transpose()?;

    let catalog = state.live.current().catalog.clone().or_seed();
    let data: Vec<Product> = match (query.search.as_deref(), vendor, category) {
        (Some(search), _, _) => catalog.search(search).into_iter().cloned().collect(),
        (None, Some(v), Some(c)) => catalog.products(v, c).into_iter().cloned().collect(),
        (None, Some(v), None) => catalog
            .all_products()
            .iter()
            .filter(|p| p.vendor == v)
            .cloned()
            .collect(),
        (None, None, Some(c)) => catalog
            .all_products()
            .iter()
            .filter(|p| p.category == c)
            .cloned()
            .collect(),
        (None, None, None) => catalog.all_products().to_vec(),
    };

    Ok(ApiResponse::new(data, req_id.0))
}

/// The stored catalog as admins edit it, without the seed fallback.
pub(super) async fn list_stored_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let catalog = state
        .live
        .store()
        .load_catalog()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(catalog.all_products().to_vec(), req_id.0))
}

/// Replaces every item. The body is an `id -> record` map in store shape;
/// records are canonicalized before saving.
pub(super) async fn replace_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<CatalogSaved>>, ApiError> {
    let Json(raw) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;
    if !raw.is_object() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "catalog body must be an object of id -> item",
        ));
    }

    let catalog = normalize_catalog(Some(&raw));
    state
        .live
        .store()
        .save_catalog(&catalog)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    publish_write(&state).await;

    Ok(ApiResponse::new(
        CatalogSaved {
            items: catalog.len(),
        },
        req_id.0,
    ))
}

pub(super) async fn remove_catalog_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let store = state.live.store();
    let mut catalog = store
        .load_catalog()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    let removed = catalog.remove(&id).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("catalog item '{id}' not found"),
        )
    })?;
    store
        .save_catalog(&catalog)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    publish_write(&state).await;

    Ok(ApiResponse::new(removed, req_id.0))
}
