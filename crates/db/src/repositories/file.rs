//! File repository.

use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder,
};

use crate::entities::{File, file};
use crate::map_db_err;

/// Repository for uploaded file records.
#[derive(Clone)]
pub struct FileRepository {
    db: Arc<DatabaseConnection>,
}

impl FileRepository {
    /// Create a new file repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<file::Model>> {
        File::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a file by ID, failing with `File not found`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<file::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// Record an uploaded file.
    pub async fn create(&self, model: file::ActiveModel) -> AppResult<file::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a file record.
    pub async fn update(&self, model: file::ActiveModel) -> AppResult<file::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a file record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        File::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// List every file of a circle, newest first.
    pub async fn list_by_circle(&self, circle_id: &str) -> AppResult<Vec<file::Model>> {
        File::find()
            .filter(file::Column::CircleId.eq(circle_id))
            .order_by(file::Column::UploadedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List files inside a folder, newest first.
    pub async fn list_by_folder(&self, folder_id: &str) -> AppResult<Vec<file::Model>> {
        File::find()
            .filter(file::Column::FolderId.eq(folder_id))
            .order_by(file::Column::UploadedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List files uploaded by a user across all circles.
    pub async fn list_by_uploader(&self, uploader_id: &str) -> AppResult<Vec<file::Model>> {
        File::find()
            .filter(file::Column::UploaderId.eq(uploader_id))
            .order_by(file::Column::UploadedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::file::FileType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_file(id: &str, circle_id: &str, folder_id: Option<&str>) -> file::Model {
        file::Model {
            id: id.to_string(),
            circle_id: circle_id.to_string(),
            folder_id: folder_id.map(ToString::to_string),
            uploader_id: "u1".to_string(),
            filename: "clip.mp4".to_string(),
            file_key: format!("circles/{circle_id}/u1-abc.mp4"),
            file_url: format!("/files/circles/{circle_id}/u1-abc.mp4"),
            mime_type: "video/mp4".to_string(),
            file_size: 1024,
            file_type: FileType::Video,
            is_paid: false,
            price: None,
            uploaded_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_by_folder() {
        let a = create_test_file("a", "c1", Some("f1"));
        let b = create_test_file("b", "c1", Some("f1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a, b]])
                .into_connection(),
        );

        let repo = FileRepository::new(db);
        let files = repo.list_by_folder("f1").await.unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.folder_id.as_deref() == Some("f1")));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<file::Model>::new()])
                .into_connection(),
        );

        let repo = FileRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "File not found"));
    }
}
