//! Circle activity feed.
//!
//! Entries are written after the mutation they describe has succeeded. A
//! failed write is logged and swallowed so the feed can never fail a request.

use chrono::{DateTime, Utc};
use circles_common::{AppError, AppResult, IdGenerator};
use circles_db::entities::circle_activity_log::{self, ActivityAction};
use circles_db::repositories::{ActivityRepository, CircleRepository, UserRepository};
use sea_orm::Set;
use serde::Serialize;
use tracing::warn;

use super::access::display_names;

/// Default number of entries returned.
pub const DEFAULT_ACTIVITY_LIMIT: u64 = 50;

/// Upper bound on entries returned.
pub const MAX_ACTIVITY_LIMIT: u64 = 100;

/// Activity entry with the actor's display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub circle_id: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub action: ActivityAction,
    pub target_id: Option<String>,
    pub target_type: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Kind of object an action refers to.
const fn target_type(action: ActivityAction) -> &'static str {
    match action {
        ActivityAction::MemberJoined | ActivityAction::MemberLeft | ActivityAction::MemberRemoved => {
            "user"
        }
        ActivityAction::FileUploaded | ActivityAction::FileDeleted => "file",
        ActivityAction::FolderCreated | ActivityAction::FolderDeleted => "folder",
        ActivityAction::CircleUpdated => "circle",
    }
}

/// Service for recording and reading circle activity.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
    circle_repo: CircleRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(
        activity_repo: ActivityRepository,
        circle_repo: CircleRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            activity_repo,
            circle_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an entry to a circle's feed.
    pub async fn record(
        &self,
        circle_id: &str,
        user_id: &str,
        action: ActivityAction,
        target_id: &str,
        description: Option<String>,
    ) {
        let model = circle_activity_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            circle_id: Set(circle_id.to_string()),
            user_id: Set(Some(user_id.to_string())),
            action: Set(action),
            target_id: Set(Some(target_id.to_string())),
            target_type: Set(Some(target_type(action).to_string())),
            description: Set(description),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = self.activity_repo.create(model).await {
            warn!(error = %e, circle_id = %circle_id, action = ?action, "Failed to record activity");
        }
    }

    /// Latest entries of a circle.
    ///
    /// Public circles are readable by anyone, private ones only by members.
    pub async fn list_for_circle(
        &self,
        viewer_id: Option<&str>,
        circle_id: &str,
        limit: Option<u64>,
    ) -> AppResult<Vec<ActivityResponse>> {
        let circle = self.circle_repo.get_by_id(circle_id).await?;

        if !circle.is_public {
            let is_member = match viewer_id {
                Some(viewer_id) => self
                    .circle_repo
                    .get_member(circle_id, viewer_id)
                    .await?
                    .is_some(),
                None => false,
            };
            if !is_member {
                return Err(AppError::Forbidden(
                    "You are not a member of this circle".to_string(),
                ));
            }
        }

        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        let entries = self.activity_repo.list_by_circle(circle_id, limit).await?;

        let names = display_names(
            &self.user_repo,
            entries.iter().filter_map(|e| e.user_id.clone()).collect(),
        )
        .await?;

        Ok(entries
            .into_iter()
            .map(|entry| ActivityResponse {
                user_name: entry
                    .user_id
                    .as_ref()
                    .and_then(|id| names.get(id).cloned()),
                id: entry.id,
                circle_id: entry.circle_id,
                user_id: entry.user_id,
                action: entry.action,
                target_id: entry.target_id,
                target_type: entry.target_type,
                description: entry.description,
                created_at: entry.created_at.into(),
            })
            .collect())
    }
}
