//! Category endpoints.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::CategoryInput;

use super::CircleIdRequest;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Success, success},
};

/// Create category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add))
        .route("/getByCircle", post(get_by_circle))
        .route("/remove", post(remove))
}

async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<ApiResponse<Success>> {
    state.category_service.add(&user.id, input).await?;
    Ok(success())
}

async fn get_by_circle(
    State(state): State<AppState>,
    Json(req): Json<CircleIdRequest>,
) -> AppResult<ApiResponse<Vec<String>>> {
    Ok(ApiResponse::ok(
        state.category_service.list(&req.circle_id).await?,
    ))
}

async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<ApiResponse<Success>> {
    state.category_service.remove(&user.id, input).await?;
    Ok(success())
}
