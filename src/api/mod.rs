pub mod error;
pub mod mappings;
pub mod pending;
pub mod response;
pub mod route;
pub mod usage;

pub use error::ApiError;
pub use route::create_router;
pub use response::{ApiResponse, with_status, with_total_count};
