//! Share link repository.

use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr,
};

use crate::entities::{FileShareLink, file_share_link};
use crate::map_db_err;

/// Repository for file share links.
#[derive(Clone)]
pub struct FileShareLinkRepository {
    db: Arc<DatabaseConnection>,
}

impl FileShareLinkRepository {
    /// Create a new share link repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a share link. A token clash surfaces as [`AppError::Conflict`].
    pub async fn create(
        &self,
        model: file_share_link::ActiveModel,
    ) -> AppResult<file_share_link::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Find a share link by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<file_share_link::Model>> {
        FileShareLink::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a share link by its public token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<file_share_link::Model>> {
        FileShareLink::find()
            .filter(file_share_link::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a share link.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        FileShareLink::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Bump the download counter atomically.
    pub async fn increment_download_count(&self, id: &str) -> AppResult<()> {
        FileShareLink::update_many()
            .col_expr(
                file_share_link::Column::DownloadCount,
                Expr::col(file_share_link::Column::DownloadCount).add(1),
            )
            .filter(file_share_link::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
