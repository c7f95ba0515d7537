//! Search over public circles.

use circles_common::{AppError, AppResult};
use circles_db::repositories::{CategoryRepository, CircleRepository};
use serde::Deserialize;
use validator::Validate;

use super::circle::{PublicCircleResponse, with_member_counts};

/// Input for name search.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchCirclesInput {
    #[validate(length(min = 1, max = 255))]
    pub query: String,
}

/// Input for category search.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchByCategoryInput {
    #[validate(length(min = 1, max = 50))]
    pub category: String,
}

/// Service for discovering public circles.
#[derive(Clone)]
pub struct SearchService {
    circle_repo: CircleRepository,
    category_repo: CategoryRepository,
}

impl SearchService {
    /// Create a new search service.
    #[must_use]
    pub const fn new(circle_repo: CircleRepository, category_repo: CategoryRepository) -> Self {
        Self {
            circle_repo,
            category_repo,
        }
    }

    /// Public circles whose name contains the query, ignoring case.
    pub async fn circles(&self, input: SearchCirclesInput) -> AppResult<Vec<PublicCircleResponse>> {
        input.validate()?;

        let query = input.query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("query: must not be blank".to_string()));
        }

        let circles = self.circle_repo.search_public_by_name(query).await?;
        with_member_counts(&self.circle_repo, circles).await
    }

    /// Public circles tagged with exactly this category.
    pub async fn by_category(
        &self,
        input: SearchByCategoryInput,
    ) -> AppResult<Vec<PublicCircleResponse>> {
        input.validate()?;

        let ids = self
            .category_repo
            .circle_ids_by_category(&input.category)
            .await?;
        let circles = self.circle_repo.find_public_by_ids(&ids).await?;

        with_member_counts(&self.circle_repo, circles).await
    }
}
