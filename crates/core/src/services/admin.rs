//! Administration: user moderation, the audit trail and platform earnings.
//!
//! Every operation requires the caller to have the admin role. Mutations
//! append to the admin log in the same request.

use chrono::{DateTime, Utc};
use circles_common::{AppError, AppResult, IdGenerator};
use circles_db::entities::admin_log::{self, AdminAction};
use circles_db::entities::{platform_earnings, user};
use circles_db::repositories::{AdminLogRepository, PaymentRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::access::require_admin;
use super::user::UserResponse;

/// Default page size for admin listings.
pub const DEFAULT_ADMIN_PAGE: u64 = 50;

const MAX_ADMIN_PAGE: u64 = 200;

/// Limit/offset pagination.
#[derive(Debug, Default, Deserialize)]
pub struct PageInput {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageInput {
    /// Resolve to `(limit, offset)` with `default_limit` when absent.
    #[must_use]
    pub fn resolve(&self, default_limit: u64) -> (u64, u64) {
        (
            self.limit.unwrap_or(default_limit).clamp(1, MAX_ADMIN_PAGE),
            self.offset.unwrap_or(0),
        )
    }
}

/// Admin log entry as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogResponse {
    pub id: String,
    pub admin_id: String,
    pub action: AdminAction,
    pub target_user_id: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<admin_log::Model> for AdminLogResponse {
    fn from(model: admin_log::Model) -> Self {
        Self {
            id: model.id,
            admin_id: model.admin_id,
            action: model.action,
            target_user_id: model.target_user_id,
            details: model.details,
            created_at: model.created_at.into(),
        }
    }
}

/// Platform revenue for one month.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEarningsResponse {
    pub month: String,
    pub total_earnings: i64,
    pub transaction_count: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<platform_earnings::Model> for PlatformEarningsResponse {
    fn from(model: platform_earnings::Model) -> Self {
        Self {
            month: model.month,
            total_earnings: model.total_earnings,
            transaction_count: model.transaction_count,
            updated_at: model.updated_at.into(),
        }
    }
}

/// Append an entry to the admin audit trail.
pub(crate) async fn record_admin_action(
    repo: &AdminLogRepository,
    id_gen: &IdGenerator,
    admin_id: &str,
    action: AdminAction,
    target_user_id: Option<String>,
    details: Option<String>,
) -> AppResult<()> {
    let model = admin_log::ActiveModel {
        id: Set(id_gen.generate()),
        admin_id: Set(admin_id.to_string()),
        action: Set(action),
        target_user_id: Set(target_user_id),
        details: Set(details),
        created_at: Set(Utc::now().into()),
    };

    repo.create(model).await?;
    info!(admin_id = %admin_id, action = ?action, "Recorded admin action");

    Ok(())
}

/// Service for administrative operations.
#[derive(Clone)]
pub struct AdminService {
    user_repo: UserRepository,
    admin_log_repo: AdminLogRepository,
    payment_repo: PaymentRepository,
    id_gen: IdGenerator,
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        admin_log_repo: AdminLogRepository,
        payment_repo: PaymentRepository,
    ) -> Self {
        Self {
            user_repo,
            admin_log_repo,
            payment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All users, oldest first.
    pub async fn list_users(&self, admin: &user::Model, page: &PageInput) -> AppResult<Vec<UserResponse>> {
        require_admin(admin)?;

        let (limit, offset) = page.resolve(DEFAULT_ADMIN_PAGE);
        Ok(self
            .user_repo
            .list(limit, offset)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Disable a user and revoke their token.
    pub async fn disable_user(&self, admin: &user::Model, user_id: &str) -> AppResult<UserResponse> {
        require_admin(admin)?;

        if admin.id == user_id {
            return Err(AppError::BadRequest("Cannot disable yourself".to_string()));
        }

        let disabled = self.user_repo.disable(user_id).await?;

        record_admin_action(
            &self.admin_log_repo,
            &self.id_gen,
            &admin.id,
            AdminAction::UserDisabled,
            Some(disabled.id.clone()),
            None,
        )
        .await?;

        Ok(disabled.into())
    }

    /// Audit trail, newest first.
    pub async fn logs(&self, admin: &user::Model, page: &PageInput) -> AppResult<Vec<AdminLogResponse>> {
        require_admin(admin)?;

        let (limit, offset) = page.resolve(DEFAULT_ADMIN_PAGE);
        Ok(self
            .admin_log_repo
            .list(limit, offset)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Platform earnings for one `YYYY-MM` month, or every month newest first.
    pub async fn platform_earnings(
        &self,
        admin: &user::Model,
        month: Option<&str>,
    ) -> AppResult<Vec<PlatformEarningsResponse>> {
        require_admin(admin)?;

        let rows = match month {
            Some(month) => self
                .payment_repo
                .find_platform_earnings(month)
                .await?
                .into_iter()
                .collect(),
            None => self.payment_repo.list_platform_earnings().await?,
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
