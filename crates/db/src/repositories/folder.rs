//! Folder repository.

use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};

use crate::entities::{File, Folder, file, folder};
use crate::map_db_err;

/// Repository for folder operations.
#[derive(Clone)]
pub struct FolderRepository {
    db: Arc<DatabaseConnection>,
}

impl FolderRepository {
    /// Create a new folder repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<folder::Model>> {
        Folder::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a folder by ID, failing with `Folder not found`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<folder::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))
    }

    /// Create a folder.
    pub async fn create(&self, model: folder::ActiveModel) -> AppResult<folder::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a folder.
    pub async fn update(&self, model: folder::ActiveModel) -> AppResult<folder::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List folders of a circle, newest first.
    pub async fn list_by_circle(&self, circle_id: &str) -> AppResult<Vec<folder::Model>> {
        Folder::find()
            .filter(folder::Column::CircleId.eq(circle_id))
            .order_by(folder::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a folder, moving its files to the circle root first.
    ///
    /// Returns how many files were detached.
    pub async fn delete_and_detach_files(&self, id: &str) -> AppResult<u64> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let detached = File::update_many()
            .col_expr(file::Column::FolderId, Expr::value(Option::<String>::None))
            .filter(file::Column::FolderId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        Folder::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(detached.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_folder(id: &str, circle_id: &str, name: &str) -> folder::Model {
        folder::Model {
            id: id.to_string(),
            circle_id: circle_id.to_string(),
            name: name.to_string(),
            description: None,
            created_by: "u1".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_by_circle() {
        let f1 = create_test_folder("f1", "c1", "Raw footage");
        let f2 = create_test_folder("f2", "c1", "Posters");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FolderRepository::new(db);
        let folders = repo.list_by_circle("c1").await.unwrap();

        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].name, "Raw footage");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<folder::Model>::new()])
                .into_connection(),
        );

        let repo = FolderRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Folder not found"));
    }

    #[tokio::test]
    async fn test_delete_and_detach_files() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = FolderRepository::new(db);
        let detached = repo.delete_and_detach_files("f1").await.unwrap();

        assert_eq!(detached, 3);
    }
}
