//! Search endpoints. Public.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::{PublicCircleResponse, SearchByCategoryInput, SearchCirclesInput};

use crate::{middleware::AppState, response::ApiResponse};

/// Create search router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/circles", post(circles))
        .route("/byCategory", post(by_category))
}

async fn circles(
    State(state): State<AppState>,
    Json(input): Json<SearchCirclesInput>,
) -> AppResult<ApiResponse<Vec<PublicCircleResponse>>> {
    Ok(ApiResponse::ok(state.search_service.circles(input).await?))
}

async fn by_category(
    State(state): State<AppState>,
    Json(input): Json<SearchByCategoryInput>,
) -> AppResult<ApiResponse<Vec<PublicCircleResponse>>> {
    Ok(ApiResponse::ok(state.search_service.by_category(input).await?))
}
