//! API endpoints.

mod activity;
mod admin;
mod announcements;
mod auth;
mod categories;
mod circles;
mod download;
mod file_share;
mod files;
mod folders;
mod payment;
mod search;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/circles", circles::router())
        .nest("/files", files::router())
        .nest("/folders", folders::router())
        .nest("/search", search::router())
        .nest("/fileShare", file_share::router())
        .nest("/activity", activity::router())
        .nest("/categories", categories::router())
        .nest("/admin", admin::router())
        .nest("/announcements", announcements::router())
        .nest("/payment", payment::router())
        .nest("/download", download::router())
}

/// Body of procedures addressing a single circle.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CircleIdRequest {
    circle_id: String,
}
