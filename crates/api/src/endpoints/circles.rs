//! Circle endpoints.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::{
    CircleDetailResponse, CircleResponse, CreateCircleInput, MyCircleResponse,
    PublicCircleResponse, UpdateCircleInput,
};
use serde::{Deserialize, Serialize};

use super::CircleIdRequest;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Success, success},
};

/// Create circle router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/get", post(get))
        .route("/list", post(list))
        .route("/listPublic", post(list_public))
        .route("/searchByInvitationCode", post(search_by_invitation_code))
        .route("/join", post(join))
        .route("/joinByInvitationCode", post(join_by_invitation_code))
        .route("/leave", post(leave))
        .route("/removeMember", post(remove_member))
        .route("/addMember", post(add_member))
        .route("/update", post(update))
        .route("/delete", post(delete))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CircleIdResponse {
    circle_id: String,
}

#[derive(Debug, Deserialize)]
struct InvitationCodeRequest {
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveMemberRequest {
    circle_id: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddMemberRequest {
    circle_id: String,
    user_email: String,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCircleInput>,
) -> AppResult<ApiResponse<CircleIdResponse>> {
    let circle = state.circle_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(CircleIdResponse {
        circle_id: circle.id,
    }))
}

async fn get(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CircleIdRequest>,
) -> AppResult<ApiResponse<CircleDetailResponse>> {
    let detail = state.circle_service.get(&user.id, &req.circle_id).await?;
    Ok(ApiResponse::ok(detail))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<MyCircleResponse>>> {
    let circles = state.circle_service.list_mine(&user.id).await?;
    Ok(ApiResponse::ok(circles))
}

async fn list_public(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PublicCircleResponse>>> {
    let circles = state.circle_service.list_public().await?;
    Ok(ApiResponse::ok(circles))
}

async fn search_by_invitation_code(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<InvitationCodeRequest>,
) -> AppResult<ApiResponse<CircleResponse>> {
    let circle = state
        .circle_service
        .find_by_invitation_code(&req.code)
        .await?;
    Ok(ApiResponse::ok(circle.into()))
}

async fn join(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CircleIdRequest>,
) -> AppResult<ApiResponse<Success>> {
    state.circle_service.join(&user.id, &req.circle_id).await?;
    Ok(success())
}

async fn join_by_invitation_code(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<InvitationCodeRequest>,
) -> AppResult<ApiResponse<CircleIdResponse>> {
    let circle_id = state
        .circle_service
        .join_by_invitation_code(&user.id, &req.code)
        .await?;
    Ok(ApiResponse::ok(CircleIdResponse { circle_id }))
}

async fn leave(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CircleIdRequest>,
) -> AppResult<ApiResponse<Success>> {
    state.circle_service.leave(&user.id, &req.circle_id).await?;
    Ok(success())
}

async fn remove_member(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RemoveMemberRequest>,
) -> AppResult<ApiResponse<Success>> {
    state
        .circle_service
        .remove_member(&user.id, &req.circle_id, &req.user_id)
        .await?;
    Ok(success())
}

async fn add_member(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddMemberRequest>,
) -> AppResult<ApiResponse<Success>> {
    state
        .circle_service
        .add_member_by_email(&user.id, &req.circle_id, &req.user_email)
        .await?;
    Ok(success())
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateCircleInput>,
) -> AppResult<ApiResponse<CircleResponse>> {
    let circle = state.circle_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(circle.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CircleIdRequest>,
) -> AppResult<ApiResponse<Success>> {
    state.circle_service.delete(&user.id, &req.circle_id).await?;
    Ok(success())
}
