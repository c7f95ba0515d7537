//! Circle category tags.

use chrono::Utc;
use circles_common::{AppError, AppResult, IdGenerator};
use circles_db::entities::circle_category;
use circles_db::repositories::{CategoryRepository, CircleRepository};
use sea_orm::Set;
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use super::access::{NOT_A_MEMBER, require_member};

/// Input for tagging or untagging a circle.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub circle_id: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
}

/// Service for circle categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    circle_repo: CircleRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository, circle_repo: CircleRepository) -> Self {
        Self {
            category_repo,
            circle_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Tag a circle. Adding a category the circle already has is a no-op.
    pub async fn add(&self, user_id: &str, input: CategoryInput) -> AppResult<()> {
        let category = input.category.trim().to_string();
        if category.is_empty() {
            return Err(AppError::Validation("category: must not be blank".to_string()));
        }
        input.validate()?;

        require_member(&self.circle_repo, &input.circle_id, user_id, NOT_A_MEMBER).await?;

        if self.category_repo.exists(&input.circle_id, &category).await? {
            return Ok(());
        }

        let model = circle_category::ActiveModel {
            id: Set(self.id_gen.generate()),
            circle_id: Set(input.circle_id),
            category: Set(category),
            created_at: Set(Utc::now().into()),
        };

        match self.category_repo.add(model).await {
            Ok(_) => Ok(()),
            Err(AppError::Conflict(_)) => {
                debug!("Category added concurrently");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Categories of a circle.
    pub async fn list(&self, circle_id: &str) -> AppResult<Vec<String>> {
        Ok(self
            .category_repo
            .list_by_circle(circle_id)
            .await?
            .into_iter()
            .map(|c| c.category)
            .collect())
    }

    /// Remove a category from a circle.
    pub async fn remove(&self, user_id: &str, input: CategoryInput) -> AppResult<()> {
        require_member(&self.circle_repo, &input.circle_id, user_id, NOT_A_MEMBER).await?;

        self.category_repo
            .remove(&input.circle_id, input.category.trim())
            .await
    }
}
