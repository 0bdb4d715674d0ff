use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: every JSON body is `{"data": ...}`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub fn with_status<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse { data })).into_response()
}

pub fn with_total_count<T: Serialize>(data: T, count: usize) -> Response {
    let mut response = ApiResponse { data }.into_response();
    response
        .headers_mut()
        .insert("x-total-count", HeaderValue::from(count));
    response
}
