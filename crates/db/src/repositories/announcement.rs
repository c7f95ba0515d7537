//! Announcement repository.

use std::sync::Arc;

use chrono::Utc;
use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::{Announcement, announcement};

/// Repository for announcement operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find announcement by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<announcement::Model>> {
        Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get announcement by ID, failing with `Announcement not found`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<announcement::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    /// Create a draft announcement.
    pub async fn create(
        &self,
        model: announcement::ActiveModel,
    ) -> AppResult<announcement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all announcements, drafts included (for admin).
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<announcement::Model>> {
        Announcement::find()
            .order_by(announcement::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find published announcements, latest first.
    pub async fn find_published(&self) -> AppResult<Vec<announcement::Model>> {
        Announcement::find()
            .filter(announcement::Column::IsPublished.eq(true))
            .order_by(announcement::Column::PublishedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark an announcement as published.
    pub async fn publish(&self, id: &str) -> AppResult<announcement::Model> {
        let announcement = self.get_by_id(id).await?;
        let now = Utc::now();

        let mut active: announcement::ActiveModel = announcement.into();
        active.is_published = Set(true);
        active.published_at = Set(Some(now.into()));
        active.updated_at = Set(Some(now.into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an announcement.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Announcement::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
