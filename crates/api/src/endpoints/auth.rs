//! Session endpoints.
//!
//! Sign-in happens through the external identity provider; these procedures
//! only inspect and end the current session.

use axum::{Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::UserResponse;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, Success, success},
};

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", post(me))
        .route("/logout", post(logout))
}

/// The caller, or `null` when not signed in.
async fn me(MaybeAuthUser(user): MaybeAuthUser) -> ApiResponse<Option<UserResponse>> {
    ApiResponse::ok(user.map(Into::into))
}

/// Revoke the caller's token.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Success>> {
    state.user_service.logout(&user.id).await?;
    Ok(success())
}
