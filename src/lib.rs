pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod reconcile;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::response::ApiResponse;
pub use api::route::create_router;
pub use config::Config;
pub use models::{MerchantMapping, PendingTransaction, ResolvedTransaction};
pub use state::AppState;
pub use validation::ValidationError;
