//! Circle category repository.

use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{CircleCategory, circle_category};
use crate::map_db_err;

/// Repository for free-form circle categories.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether a circle already carries a category.
    pub async fn exists(&self, circle_id: &str, category: &str) -> AppResult<bool> {
        let count = CircleCategory::find()
            .filter(circle_category::Column::CircleId.eq(circle_id))
            .filter(circle_category::Column::Category.eq(category))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Tag a circle with a category.
    pub async fn add(
        &self,
        model: circle_category::ActiveModel,
    ) -> AppResult<circle_category::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Remove a category from a circle.
    pub async fn remove(&self, circle_id: &str, category: &str) -> AppResult<()> {
        CircleCategory::delete_many()
            .filter(circle_category::Column::CircleId.eq(circle_id))
            .filter(circle_category::Column::Category.eq(category))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Categories of a circle in the order they were added.
    pub async fn list_by_circle(&self, circle_id: &str) -> AppResult<Vec<circle_category::Model>> {
        CircleCategory::find()
            .filter(circle_category::Column::CircleId.eq(circle_id))
            .order_by(circle_category::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of circles tagged with a category.
    pub async fn circle_ids_by_category(&self, category: &str) -> AppResult<Vec<String>> {
        CircleCategory::find()
            .select_only()
            .column(circle_category::Column::CircleId)
            .filter(circle_category::Column::Category.eq(category))
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    #[tokio::test]
    async fn test_exists_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        assert!(!repo.exists("c1", "film").await.unwrap());
    }

    #[tokio::test]
    async fn test_circle_ids_by_category() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! { "circle_id" => Value::from("c1") },
                    maplit::btreemap! { "circle_id" => Value::from("c2") },
                ]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let ids = repo.circle_ids_by_category("film").await.unwrap();

        assert_eq!(ids, vec!["c1".to_string(), "c2".to_string()]);
    }
}
