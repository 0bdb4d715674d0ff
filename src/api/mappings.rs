use crate::{
    api::{
        error::ApiError,
        response::{with_status, with_total_count, ApiResponse},
    },
    db::mapping,
    models::{
        CategoryLookup, CountOutcome, DeleteMappingRequest, MerchantMapping,
        UpdateMappingRequest, UpsertMappingRequest,
    },
    reconcile::TagUpdate,
    state::AppState,
    validation::{require_text, validate_id_input},
};
use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

// GET /api/mappings/category query parameters
#[derive(Deserialize)]
pub struct CategoryQuery {
    store_name: Option<String>,
}

// GET /api/mappings
pub async fn list_mappings(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let mappings = mapping::list_mappings(&state.db_pool).await?;
    let total = mappings.len();
    Ok(with_total_count(mappings, total))
}

// POST /api/mappings
pub async fn upsert_mapping(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpsertMappingRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let store_name = require_text("store_name", request.store_name.as_deref())?;
    let category = require_text("category", request.category.as_deref())?;
    let tags = TagUpdate::from_request(request.tags, request.clear_tags);

    let outcome =
        mapping::upsert_mapping(&state.db_pool, &store_name, &category, &tags, Utc::now())
            .await?;

    info!("Upserted mapping {} -> {} ({:?})", store_name, category, tags);

    let status = if outcome.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok(with_status(status, outcome))
}

// PUT /api/mappings
pub async fn update_mapping(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateMappingRequest>, JsonRejection>,
) -> Result<ApiResponse<MerchantMapping>, ApiError> {
    let Json(request) = payload?;

    let id = validate_id_input(request.id.as_ref())?;
    let category = require_text("category", request.category.as_deref())?;
    let tags = TagUpdate::from_request(request.tags, request.clear_tags);

    if !mapping::update_mapping(&state.db_pool, id, &category, &tags, Utc::now()).await? {
        return Err(ApiError::NotFound(format!("Mapping {} not found", id)));
    }

    let updated = mapping::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Mapping {} not found", id)))?;

    info!("Updated mapping {} for store {}", id, updated.store_name);
    Ok(ApiResponse { data: updated })
}

// DELETE /api/mappings
pub async fn delete_mapping(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeleteMappingRequest>, JsonRejection>,
) -> Result<ApiResponse<CountOutcome>, ApiError> {
    let Json(request) = payload?;
    let id = validate_id_input(request.id.as_ref())?;

    if !mapping::delete_mapping(&state.db_pool, id).await? {
        return Err(ApiError::NotFound(format!("Mapping {} not found", id)));
    }

    info!("Deleted mapping {}", id);
    Ok(ApiResponse {
        data: CountOutcome {
            count: 1,
            message: "Mapping deleted successfully".to_string(),
        },
    })
}

// GET /api/mappings/category
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<ApiResponse<CategoryLookup>, ApiError> {
    let Query(params) = query?;
    let store_name = require_text("store_name", params.store_name.as_deref())?;

    let category = mapping::find_by_store(&state.db_pool, &store_name)
        .await?
        .map(|m| m.category);

    Ok(ApiResponse {
        data: CategoryLookup { store_name, category },
    })
}
