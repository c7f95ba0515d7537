//! Activity feed endpoint.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::ActivityResponse;
use serde::Deserialize;

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Create activity router.
pub fn router() -> Router<AppState> {
    Router::new().route("/getCircleActivity", post(get_circle_activity))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CircleActivityRequest {
    circle_id: String,
    limit: Option<u64>,
}

async fn get_circle_activity(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<CircleActivityRequest>,
) -> AppResult<ApiResponse<Vec<ActivityResponse>>> {
    let entries = state
        .activity_service
        .list_for_circle(user.as_ref().map(|u| u.id.as_str()), &req.circle_id, req.limit)
        .await?;
    Ok(ApiResponse::ok(entries))
}
