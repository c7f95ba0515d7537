//! Folder endpoints.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::{CreateFolderInput, FileResponse, FolderResponse, RenameFolderInput};
use serde::{Deserialize, Serialize};

use super::CircleIdRequest;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Success, success},
};

/// Create folder router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
        .route("/rename", post(rename))
        .route("/delete", post(delete))
        .route("/files", post(files))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderIdRequest {
    folder_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FolderIdResponse {
    folder_id: String,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFolderInput>,
) -> AppResult<ApiResponse<FolderIdResponse>> {
    let folder = state.folder_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(FolderIdResponse {
        folder_id: folder.id,
    }))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CircleIdRequest>,
) -> AppResult<ApiResponse<Vec<FolderResponse>>> {
    let folders = state.folder_service.list(&user.id, &req.circle_id).await?;
    Ok(ApiResponse::ok(folders))
}

async fn rename(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RenameFolderInput>,
) -> AppResult<ApiResponse<Success>> {
    state.folder_service.rename(&user.id, input).await?;
    Ok(success())
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FolderIdRequest>,
) -> AppResult<ApiResponse<Success>> {
    state.folder_service.delete(&user.id, &req.folder_id).await?;
    Ok(success())
}

async fn files(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FolderIdRequest>,
) -> AppResult<ApiResponse<Vec<FileResponse>>> {
    let files = state.folder_service.files(&user.id, &req.folder_id).await?;
    Ok(ApiResponse::ok(files))
}
