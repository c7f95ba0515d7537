//! File download redirect.

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use circles_common::AppResult;
use tracing::debug;

use crate::middleware::AppState;

/// Create download router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{file_id}", get(download))
}

/// `Content-Disposition` value forcing a download under the original name.
fn content_disposition(filename: &str) -> String {
    let encoded = urlencoding::encode(filename);
    format!("attachment; filename=\"{encoded}\"; filename*=UTF-8''{encoded}")
}

/// Redirect to the stored object. Anyone holding the file ID may download.
async fn download(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> AppResult<Response> {
    let file = state.file_service.get_public(&file_id).await?;
    debug!(file_id = %file.id, "Redirecting download");

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, file.file_url),
            (header::CONTENT_TYPE, file.mime_type),
            (header::CONTENT_DISPOSITION, content_disposition(&file.filename)),
        ],
    )
        .into_response())
}
