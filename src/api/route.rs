use crate::{
    api::{error::ApiError, mappings, pending, usage},
    state::AppState,
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/mappings",
            get(mappings::list_mappings)
                .post(mappings::upsert_mapping)
                .put(mappings::update_mapping)
                .delete(mappings::delete_mapping),
        )
        .route("/api/mappings/category", get(mappings::get_category))
        .route(
            "/api/pending",
            get(pending::list_pending).post(pending::create_pending),
        )
        .route("/api/pending/summary", get(pending::pending_summary))
        .route("/api/pending/deduplicate", post(pending::deduplicate_pending))
        .route("/api/pending/processed", delete(pending::clear_processed))
        .route("/api/pending/{id}", delete(pending::delete_pending))
        .route("/api/pending/{id}/processed", post(pending::mark_processed))
        .route("/api/pending/{id}/description", post(pending::update_description))
        .route("/api/pending/{id}/mapping", post(pending::assign_mapping))
        .route("/api/categories/common", get(usage::common_categories))
        .route("/api/categories/sync", post(usage::sync_categories))
        .route("/api/tags/common", get(usage::common_tags))
        .route("/api/tags/sync", post(usage::sync_tags))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("No such route".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
