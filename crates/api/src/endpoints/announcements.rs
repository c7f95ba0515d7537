//! Public announcement endpoint.

use axum::{Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::AnnouncementResponse;

use crate::{middleware::AppState, response::ApiResponse};

/// Create announcement router.
pub fn router() -> Router<AppState> {
    Router::new().route("/list", post(list))
}

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<AnnouncementResponse>>> {
    Ok(ApiResponse::ok(
        state.announcement_service.list_published().await?,
    ))
}
