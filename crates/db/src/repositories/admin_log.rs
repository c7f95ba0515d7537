//! Admin audit log repository.

use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Order, QueryOrder, QuerySelect};

use crate::entities::{AdminLog, admin_log};

/// Repository for the admin audit trail.
#[derive(Clone)]
pub struct AdminLogRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminLogRepository {
    /// Create a new admin log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record an admin action.
    pub async fn create(&self, model: admin_log::ActiveModel) -> AppResult<admin_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Latest entries first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<admin_log::Model>> {
        AdminLog::find()
            .order_by(admin_log::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
