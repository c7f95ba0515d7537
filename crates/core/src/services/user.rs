//! User service.

use chrono::{DateTime, Utc};
use circles_common::{AppResult, IdGenerator};
use circles_db::entities::user::{self, UserRole};
use circles_db::repositories::UserRepository;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Identity asserted by the external sign-in provider.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdentityInput {
    #[validate(length(min = 1, max = 255))]
    pub open_id: String,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub login_method: Option<String>,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: UserRole,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_signed_in_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            login_method: model.login_method,
            role: model.role,
            is_disabled: model.is_disabled,
            created_at: model.created_at.into(),
            last_signed_in_at: model.last_signed_in_at.map(Into::into),
        }
    }
}

/// Service for user identity and sessions.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
    owner_open_id: Option<String>,
}

impl UserService {
    /// Create a new user service.
    ///
    /// `owner_open_id` names the identity that is promoted to admin on sign-in.
    #[must_use]
    pub const fn new(user_repo: UserRepository, owner_open_id: Option<String>) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
            owner_open_id,
        }
    }

    /// Resolve a bearer token to an active user.
    pub async fn authenticate(&self, token: &str) -> AppResult<Option<user::Model>> {
        Ok(self
            .user_repo
            .find_by_token(token)
            .await?
            .filter(|user| !user.is_disabled))
    }

    /// Create or refresh the user behind an external identity.
    pub async fn upsert_identity(&self, input: IdentityInput) -> AppResult<user::Model> {
        input.validate()?;

        let now = Utc::now();
        let is_owner = self.owner_open_id.as_deref() == Some(input.open_id.as_str());

        if let Some(existing) = self.user_repo.find_by_open_id(&input.open_id).await? {
            let needs_token = existing.token.is_none();
            let mut active: user::ActiveModel = existing.into();

            if input.name.is_some() {
                active.name = Set(input.name);
            }
            if input.email.is_some() {
                active.email = Set(input.email);
            }
            if input.login_method.is_some() {
                active.login_method = Set(input.login_method);
            }
            if is_owner {
                active.role = Set(UserRole::Admin);
            }
            if needs_token {
                active.token = Set(Some(self.id_gen.generate_token()));
            }
            active.last_signed_in_at = Set(Some(now.into()));
            active.updated_at = Set(Some(now.into()));

            return self.user_repo.update(active).await;
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            open_id: Set(input.open_id),
            name: Set(input.name),
            email: Set(input.email),
            login_method: Set(input.login_method),
            role: Set(if is_owner {
                UserRole::Admin
            } else {
                UserRole::User
            }),
            token: Set(Some(self.id_gen.generate_token())),
            is_disabled: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(None),
            last_signed_in_at: Set(Some(now.into())),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, role = ?user.role, "Registered user");

        Ok(user)
    }

    /// Invalidate the caller's token by replacing it.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        self.user_repo
            .set_token(user_id, Some(self.id_gen.generate_token()))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, open_id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            open_id: open_id.to_string(),
            name: Some("Alice".to_string()),
            email: None,
            login_method: Some("github".to_string()),
            role,
            token: Some("tok".to_string()),
            is_disabled: false,
            created_at: Utc::now().into(),
            updated_at: None,
            last_signed_in_at: None,
        }
    }

    fn identity(open_id: &str) -> IdentityInput {
        IdentityInput {
            open_id: open_id.to_string(),
            name: Some("Alice".to_string()),
            email: None,
            login_method: Some("github".to_string()),
        }
    }

    #[tokio::test]
    async fn test_authenticate_rejects_disabled_user() {
        let mut user = create_test_user("u1", "oid", UserRole::User);
        user.is_disabled = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db), None);
        assert!(service.authenticate("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_identity_creates_owner_as_admin() {
        let created = create_test_user("u1", "root", UserRole::Admin);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db), Some("root".to_string()));
        let user = service.upsert_identity(identity("root")).await.unwrap();

        assert!(user.is_admin());
        assert!(user.token.is_some());
    }

    #[tokio::test]
    async fn test_upsert_identity_refreshes_existing_user() {
        let existing = create_test_user("u1", "oid", UserRole::User);
        let refreshed = existing.clone();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_query_results([[refreshed]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db), Some("root".to_string()));
        let user = service.upsert_identity(identity("oid")).await.unwrap();

        assert_eq!(user.id, "u1");
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_upsert_identity_validates_open_id() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = UserService::new(UserRepository::new(db), None);

        let result = service.upsert_identity(identity("")).await;
        assert!(matches!(result, Err(circles_common::AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_logout_rotates_token() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db), None);
        service.logout("u1").await.unwrap();
    }
}
