//! API response types.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Body of procedures that only report success.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

/// `{"data": {"success": true}}`.
#[must_use]
pub const fn success() -> ApiResponse<Success> {
    ApiResponse::ok(Success { success: true })
}
