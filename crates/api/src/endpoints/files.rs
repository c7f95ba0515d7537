//! File endpoints.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::{FileResponse, MyUploadResponse, SetPriceInput, UploadFileInput, UploadedFile};
use serde::Deserialize;

use super::CircleIdRequest;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Success, success},
};

/// Create file router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/list", post(list))
        .route("/delete", post(delete))
        .route("/myUploads", post(my_uploads))
        .route("/setPrice", post(set_price))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileIdRequest {
    file_id: String,
}

async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UploadFileInput>,
) -> AppResult<ApiResponse<UploadedFile>> {
    let uploaded = state.file_service.upload(&user.id, input).await?;
    Ok(ApiResponse::ok(uploaded))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CircleIdRequest>,
) -> AppResult<ApiResponse<Vec<FileResponse>>> {
    let files = state.file_service.list(&user.id, &req.circle_id).await?;
    Ok(ApiResponse::ok(files))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FileIdRequest>,
) -> AppResult<ApiResponse<Success>> {
    state.file_service.delete(&user.id, &req.file_id).await?;
    Ok(success())
}

async fn my_uploads(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<MyUploadResponse>>> {
    let files = state.file_service.my_uploads(&user.id).await?;
    Ok(ApiResponse::ok(files))
}

async fn set_price(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetPriceInput>,
) -> AppResult<ApiResponse<FileResponse>> {
    let file = state.file_service.set_price(&user.id, input).await?;
    Ok(ApiResponse::ok(file))
}
