//! Share link endpoints.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::{CreateShareLinkInput, ShareLinkCreated, SharedFileResponse};
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Success, success},
};

/// Create share link router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createLink", post(create_link))
        .route("/getByToken", post(get_by_token))
        .route("/deleteLink", post(delete_link))
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkIdRequest {
    link_id: String,
}

async fn create_link(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateShareLinkInput>,
) -> AppResult<ApiResponse<ShareLinkCreated>> {
    let link = state.file_share_service.create_link(&user.id, input).await?;
    Ok(ApiResponse::ok(link))
}

/// Resolve a token. No session required.
async fn get_by_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> AppResult<ApiResponse<SharedFileResponse>> {
    let shared = state.file_share_service.get_by_token(&req.token).await?;
    Ok(ApiResponse::ok(shared))
}

async fn delete_link(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LinkIdRequest>,
) -> AppResult<ApiResponse<Success>> {
    state
        .file_share_service
        .delete_link(&user.id, &req.link_id)
        .await?;
    Ok(success())
}
