//! Circle activity log repository.

use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::entities::{CircleActivityLog, circle_activity_log};

/// Repository for the per-circle activity feed.
#[derive(Clone)]
pub struct ActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityRepository {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an entry.
    pub async fn create(
        &self,
        model: circle_activity_log::ActiveModel,
    ) -> AppResult<circle_activity_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Latest entries of a circle, newest first.
    pub async fn list_by_circle(
        &self,
        circle_id: &str,
        limit: u64,
    ) -> AppResult<Vec<circle_activity_log::Model>> {
        CircleActivityLog::find()
            .filter(circle_activity_log::Column::CircleId.eq(circle_id))
            .order_by(circle_activity_log::Column::CreatedAt, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
