//! Announcement service.

use chrono::{DateTime, Utc};
use circles_common::{AppResult, IdGenerator};
use circles_db::entities::admin_log::AdminAction;
use circles_db::entities::{announcement, user};
use circles_db::repositories::{AdminLogRepository, AnnouncementRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::access::require_admin;
use super::admin::{PageInput, record_admin_action};

const DEFAULT_ANNOUNCEMENT_PAGE: u64 = 20;

/// Input for creating an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Announcement as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_by: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<announcement::Model> for AnnouncementResponse {
    fn from(model: announcement::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            created_by: model.created_by,
            is_published: model.is_published,
            published_at: model.published_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// Service for site-wide announcements.
#[derive(Clone)]
pub struct AnnouncementService {
    announcement_repo: AnnouncementRepository,
    admin_log_repo: AdminLogRepository,
    id_gen: IdGenerator,
}

impl AnnouncementService {
    /// Create a new announcement service.
    #[must_use]
    pub const fn new(
        announcement_repo: AnnouncementRepository,
        admin_log_repo: AdminLogRepository,
    ) -> Self {
        Self {
            announcement_repo,
            admin_log_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Published announcements, latest first.
    pub async fn list_published(&self) -> AppResult<Vec<AnnouncementResponse>> {
        Ok(self
            .announcement_repo
            .find_published()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Every announcement including drafts. Admin only.
    pub async fn list_all(
        &self,
        admin: &user::Model,
        page: &PageInput,
    ) -> AppResult<Vec<AnnouncementResponse>> {
        require_admin(admin)?;

        let (limit, offset) = page.resolve(DEFAULT_ANNOUNCEMENT_PAGE);
        Ok(self
            .announcement_repo
            .find_all(limit, offset)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Create a draft. Admin only.
    pub async fn create(
        &self,
        admin: &user::Model,
        input: CreateAnnouncementInput,
    ) -> AppResult<AnnouncementResponse> {
        require_admin(admin)?;
        input.validate()?;

        let model = announcement::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            content: Set(input.content),
            created_by: Set(admin.id.clone()),
            is_published: Set(false),
            published_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        Ok(self.announcement_repo.create(model).await?.into())
    }

    /// Make a draft visible. Admin only.
    pub async fn publish(&self, admin: &user::Model, id: &str) -> AppResult<AnnouncementResponse> {
        require_admin(admin)?;

        let published = self.announcement_repo.publish(id).await?;

        record_admin_action(
            &self.admin_log_repo,
            &self.id_gen,
            &admin.id,
            AdminAction::AnnouncementPublished,
            None,
            Some(published.title.clone()),
        )
        .await?;

        Ok(published.into())
    }

    /// Delete an announcement. Admin only.
    pub async fn delete(&self, admin: &user::Model, id: &str) -> AppResult<()> {
        require_admin(admin)?;

        let existing = self.announcement_repo.get_by_id(id).await?;
        self.announcement_repo.delete(&existing.id).await?;

        record_admin_action(
            &self.admin_log_repo,
            &self.id_gen,
            &admin.id,
            AdminAction::AnnouncementDeleted,
            None,
            Some(existing.title),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use circles_common::AppError;
    use circles_db::entities::admin_log;
    use circles_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(role: UserRole) -> user::Model {
        user::Model {
            id: "root".to_string(),
            open_id: "oid-root".to_string(),
            name: None,
            email: None,
            login_method: None,
            role,
            token: None,
            is_disabled: false,
            created_at: Utc::now().into(),
            updated_at: None,
            last_signed_in_at: None,
        }
    }

    fn create_test_announcement(published: bool) -> announcement::Model {
        announcement::Model {
            id: "n1".to_string(),
            title: "Maintenance".to_string(),
            content: "Tonight at 22:00".to_string(),
            created_by: "root".to_string(),
            is_published: published,
            published_at: published.then(|| Utc::now().into()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn log_row(action: AdminAction) -> admin_log::Model {
        admin_log::Model {
            id: "l1".to_string(),
            admin_id: "root".to_string(),
            action,
            target_user_id: None,
            details: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: DatabaseConnection) -> AnnouncementService {
        let db = Arc::new(db);
        AnnouncementService::new(
            AnnouncementRepository::new(db.clone()),
            AdminLogRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(
                &create_test_user(UserRole::User),
                CreateAnnouncementInput {
                    title: "Hi".to_string(),
                    content: "Hello".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_draft() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_announcement(false)]])
            .into_connection();

        let created = service(db)
            .create(
                &create_test_user(UserRole::Admin),
                CreateAnnouncementInput {
                    title: "Maintenance".to_string(),
                    content: "Tonight at 22:00".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(!created.is_published);
    }

    #[tokio::test]
    async fn test_publish_logs_action() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_announcement(false)]])
            .append_query_results([[create_test_announcement(true)]])
            .append_query_results([[log_row(AdminAction::AnnouncementPublished)]])
            .into_connection();

        let published = service(db)
            .publish(&create_test_user(UserRole::Admin), "n1")
            .await
            .unwrap();

        assert!(published.is_published);
        assert!(published.published_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_unknown_announcement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<announcement::Model>::new()])
            .into_connection();

        let result = service(db)
            .delete(&create_test_user(UserRole::Admin), "missing")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Announcement not found"));
    }

    #[tokio::test]
    async fn test_delete_logs_action() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_announcement(true)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[log_row(AdminAction::AnnouncementDeleted)]])
            .into_connection();

        service(db)
            .delete(&create_test_user(UserRole::Admin), "n1")
            .await
            .unwrap();
    }
}
