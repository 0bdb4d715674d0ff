use crate::{
    api::{
        error::ApiError,
        response::{with_status, with_total_count, ApiResponse},
    },
    db::{mapping, pending},
    models::{
        AssignMappingRequest, CountOutcome, CreatePendingRequest, Created, DescriptionRequest,
        NewPendingTransaction, PendingTransaction, ProcessedOutcome,
    },
    reconcile::{classify, find_duplicates, resolve_mappings, PendingSummary},
    state::AppState,
    validation::{require_text, validate_amount, validate_date, validate_id, validate_tags},
};
use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// GET /api/pending query parameters
#[derive(Deserialize)]
pub struct ListPendingQuery {
    join: Option<bool>,
}

// GET /api/pending/summary query parameters
#[derive(Deserialize)]
pub struct SummaryQuery {
    history_limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DedupReport {
    pub deleted_count: u64,
    pub removed_ids: Vec<i64>,
    pub message: String,
}

// GET /api/pending
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListPendingQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    let transactions = pending::list_pending(&state.db_pool).await?;
    let total = transactions.len();

    if params.join == Some(false) {
        return Ok(with_total_count(transactions, total));
    }

    let mappings = mapping::list_mappings(&state.db_pool).await?;
    Ok(with_total_count(resolve_mappings(transactions, &mappings), total))
}

// POST /api/pending
pub async fn create_pending(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePendingRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let transaction = NewPendingTransaction {
        store_name: require_text("store_name", request.store_name.as_deref())?,
        amount: validate_amount(request.amount.as_ref())?,
        currency: require_text("currency", request.currency.as_deref())?,
        date: validate_date(request.date.as_deref())?,
        email_id: require_text("email_id", request.email_id.as_deref())?,
        requires_description: request.requires_description,
    };

    let id = pending::insert_pending(&state.db_pool, &transaction, Utc::now()).await?;
    info!(
        "Saved pending transaction {}: {} {} {} on {}",
        id, transaction.store_name, transaction.amount, transaction.currency, transaction.date
    );

    Ok(with_status(StatusCode::CREATED, Created { id }))
}

// GET /api/pending/summary
pub async fn pending_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<ApiResponse<PendingSummary>, ApiError> {
    let Query(params) = query?;
    let history_limit = params.history_limit.unwrap_or(state.config.history_limit);

    let transactions = pending::list_pending(&state.db_pool).await?;
    let mappings = mapping::list_mappings(&state.db_pool).await?;
    let summary = classify(resolve_mappings(transactions, &mappings), history_limit);

    Ok(ApiResponse { data: summary })
}

// POST /api/pending/deduplicate
pub async fn deduplicate_pending(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<DedupReport>, ApiError> {
    let transactions = pending::list_pending(&state.db_pool).await?;
    if transactions.is_empty() {
        return Ok(ApiResponse {
            data: DedupReport {
                deleted_count: 0,
                removed_ids: Vec::new(),
                message: "No transactions to deduplicate".to_string(),
            },
        });
    }

    let removed_ids = find_duplicates(&transactions);
    if removed_ids.is_empty() {
        return Ok(ApiResponse {
            data: DedupReport {
                deleted_count: 0,
                removed_ids,
                message: "No duplicates found".to_string(),
            },
        });
    }

    let deleted_count = pending::delete_many(&state.db_pool, &removed_ids).await?;
    if deleted_count < removed_ids.len() as u64 {
        warn!(
            "Deduplication removed {} of {} duplicates; the rest were already gone",
            deleted_count,
            removed_ids.len()
        );
    }
    info!("Removed {} duplicate pending transaction(s)", deleted_count);

    Ok(ApiResponse {
        data: DedupReport {
            deleted_count,
            removed_ids,
            message: format!("Removed {} duplicate transaction(s)", deleted_count),
        },
    })
}

// DELETE /api/pending/processed
pub async fn clear_processed(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<CountOutcome>, ApiError> {
    let count = pending::delete_processed(&state.db_pool).await?;
    info!("Cleared {} processed transaction(s)", count);

    Ok(ApiResponse {
        data: CountOutcome {
            count,
            message: format!("Cleared {} processed transaction(s)", count),
        },
    })
}

// DELETE /api/pending/{id}
pub async fn delete_pending(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<CountOutcome>, ApiError> {
    let id = validate_id(&raw_id)?;

    if !pending::delete_pending(&state.db_pool, id).await? {
        return Err(ApiError::NotFound(format!("Pending transaction {} not found", id)));
    }

    info!("Deleted pending transaction {}", id);
    Ok(ApiResponse {
        data: CountOutcome {
            count: 1,
            message: "Pending transaction deleted successfully".to_string(),
        },
    })
}

// POST /api/pending/{id}/processed
//
// No mapping is required: the external job and manual overrides both use this.
pub async fn mark_processed(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<ProcessedOutcome>, ApiError> {
    let id = validate_id(&raw_id)?;

    let matched = pending::mark_processed(&state.db_pool, id, Utc::now()).await?;
    if matched == 0 {
        return Err(ApiError::NotFound(format!("Pending transaction {} not found", id)));
    }

    info!("Marked pending transaction {} as processed", id);
    Ok(ApiResponse {
        data: ProcessedOutcome {
            id,
            matched,
            modified: matched,
        },
    })
}

// POST /api/pending/{id}/description
pub async fn update_description(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<DescriptionRequest>, JsonRejection>,
) -> Result<ApiResponse<PendingTransaction>, ApiError> {
    let id = validate_id(&raw_id)?;
    let Json(request) = payload?;

    let description = request
        .description
        .ok_or_else(|| ApiError::BadRequest("Missing required field: description".to_string()))?;
    let description = description.trim();
    let stored = (!description.is_empty()).then_some(description);

    if !pending::set_description(&state.db_pool, id, stored, Utc::now()).await? {
        return Err(ApiError::NotFound(format!("Transaction {} not found", id)));
    }

    Ok(ApiResponse { data: fetch_updated(&state, id).await? })
}

// POST /api/pending/{id}/mapping
pub async fn assign_mapping(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<AssignMappingRequest>, JsonRejection>,
) -> Result<ApiResponse<PendingTransaction>, ApiError> {
    let id = validate_id(&raw_id)?;
    let Json(request) = payload?;

    let category = require_text("category", request.category.as_deref())?;
    let tags = validate_tags(request.tags.unwrap_or_default());

    if !pending::assign_mapping(&state.db_pool, id, &category, &tags, Utc::now()).await? {
        return Err(ApiError::NotFound(format!("Transaction {} not found", id)));
    }

    info!("Assigned category {} directly to transaction {}", category, id);
    Ok(ApiResponse { data: fetch_updated(&state, id).await? })
}

// Re-read after a write; a concurrent delete in between surfaces as 404.
async fn fetch_updated(state: &AppState, id: i64) -> Result<PendingTransaction, ApiError> {
    pending::get_pending(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction {} not found", id)))
}
