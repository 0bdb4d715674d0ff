use crate::{
    api::{error::ApiError, response::ApiResponse},
    db::usage::{self, UsageKind},
    models::{CountOutcome, Suggestions, SyncCategoriesRequest, SyncTagsRequest, UsageEntry},
    state::AppState,
    validation::ValidationError,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

async fn common(state: &AppState, kind: UsageKind) -> Result<ApiResponse<Suggestions>, ApiError> {
    let names = usage::top_names(&state.db_pool, kind, state.config.suggestion_limit).await?;
    Ok(ApiResponse {
        data: Suggestions {
            count: names.len(),
            names,
        },
    })
}

async fn sync(
    state: &AppState,
    kind: UsageKind,
    entries: Option<Vec<UsageEntry>>,
) -> Result<ApiResponse<CountOutcome>, ApiError> {
    let entries =
        entries.ok_or_else(|| ValidationError::MissingParameter(kind.label().to_string()))?;

    let entries: Vec<UsageEntry> = entries
        .into_iter()
        .map(|entry| {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ValidationError::InvalidParameter(format!(
                    "{} entries must have a name",
                    kind.label()
                )));
            }
            Ok(UsageEntry {
                name: name.to_string(),
                usage_count: entry.usage_count,
            })
        })
        .collect::<Result<_, _>>()?;

    let count = usage::replace_usage(&state.db_pool, kind, &entries, Utc::now()).await?;

    Ok(ApiResponse {
        data: CountOutcome {
            count,
            message: format!("Synced {} {}", count, kind.label()),
        },
    })
}

// GET /api/categories/common
pub async fn common_categories(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Suggestions>, ApiError> {
    common(&state, UsageKind::Category).await
}

// POST /api/categories/sync
pub async fn sync_categories(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SyncCategoriesRequest>, JsonRejection>,
) -> Result<ApiResponse<CountOutcome>, ApiError> {
    let Json(request) = payload?;
    sync(&state, UsageKind::Category, request.categories).await
}

// GET /api/tags/common
pub async fn common_tags(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Suggestions>, ApiError> {
    common(&state, UsageKind::Tag).await
}

// POST /api/tags/sync
pub async fn sync_tags(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SyncTagsRequest>, JsonRejection>,
) -> Result<ApiResponse<CountOutcome>, ApiError> {
    let Json(request) = payload?;
    sync(&state, UsageKind::Tag, request.tags).await
}
