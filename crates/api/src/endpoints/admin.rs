//! Admin endpoints. Every procedure requires the admin role.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::{
    AdminLogResponse, AnnouncementResponse, CreateAnnouncementInput, PageInput,
    PlatformEarningsResponse, UserResponse,
};
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Success, success},
};

/// Create admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getAnnouncements", post(get_announcements))
        .route("/createAnnouncement", post(create_announcement))
        .route("/publishAnnouncement", post(publish_announcement))
        .route("/deleteAnnouncement", post(delete_announcement))
        .route("/getAllUsers", post(get_all_users))
        .route("/disableUser", post(disable_user))
        .route("/getAdminLogs", post(get_admin_logs))
        .route("/getPlatformEarnings", post(get_platform_earnings))
}

#[derive(Debug, Deserialize)]
struct IdRequest {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserIdRequest {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct MonthRequest {
    month: Option<String>,
}

async fn get_announcements(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(page): Json<PageInput>,
) -> AppResult<ApiResponse<Vec<AnnouncementResponse>>> {
    let announcements = state.announcement_service.list_all(&admin, &page).await?;
    Ok(ApiResponse::ok(announcements))
}

async fn create_announcement(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAnnouncementInput>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    let announcement = state.announcement_service.create(&admin, input).await?;
    Ok(ApiResponse::ok(announcement))
}

async fn publish_announcement(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<IdRequest>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    let announcement = state.announcement_service.publish(&admin, &req.id).await?;
    Ok(ApiResponse::ok(announcement))
}

async fn delete_announcement(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<IdRequest>,
) -> AppResult<ApiResponse<Success>> {
    state.announcement_service.delete(&admin, &req.id).await?;
    Ok(success())
}

async fn get_all_users(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(page): Json<PageInput>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.admin_service.list_users(&admin, &page).await?;
    Ok(ApiResponse::ok(users))
}

async fn disable_user(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UserIdRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.admin_service.disable_user(&admin, &req.user_id).await?;
    Ok(ApiResponse::ok(user))
}

async fn get_admin_logs(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(page): Json<PageInput>,
) -> AppResult<ApiResponse<Vec<AdminLogResponse>>> {
    let logs = state.admin_service.logs(&admin, &page).await?;
    Ok(ApiResponse::ok(logs))
}

async fn get_platform_earnings(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<MonthRequest>,
) -> AppResult<ApiResponse<Vec<PlatformEarningsResponse>>> {
    let earnings = state
        .admin_service
        .platform_earnings(&admin, req.month.as_deref())
        .await?;
    Ok(ApiResponse::ok(earnings))
}
