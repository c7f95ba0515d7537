//! Authorization checks and display-name lookups shared by the services.

use std::collections::HashMap;

use circles_common::{AppError, AppResult};
use circles_db::entities::{circle_member, user};
use circles_db::repositories::{CircleRepository, UserRepository};

/// Message returned when a circle-scoped action is attempted by an outsider.
pub(crate) const NOT_A_MEMBER: &str = "Not a member of this circle";

/// Require the user to hold any membership row in the circle.
pub(crate) async fn require_member(
    circles: &CircleRepository,
    circle_id: &str,
    user_id: &str,
    message: &str,
) -> AppResult<circle_member::Model> {
    circles
        .get_member(circle_id, user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden(message.to_string()))
}

/// Require the user to be the circle owner.
pub(crate) async fn require_owner(
    circles: &CircleRepository,
    circle_id: &str,
    user_id: &str,
    message: &str,
) -> AppResult<circle_member::Model> {
    match circles.get_member(circle_id, user_id).await? {
        Some(member) if member.role.is_owner() => Ok(member),
        _ => Err(AppError::Forbidden(message.to_string())),
    }
}

/// Require the caller to have the admin role.
pub(crate) fn require_admin(user: &user::Model) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

/// Resolve display names for a set of user IDs.
///
/// Users without a name, or that no longer exist, are absent from the map.
pub(crate) async fn display_names(
    users: &UserRepository,
    mut ids: Vec<String>,
) -> AppResult<HashMap<String, String>> {
    ids.sort_unstable();
    ids.dedup();

    Ok(users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .filter_map(|u| u.name.map(|name| (u.id, name)))
        .collect())
}
