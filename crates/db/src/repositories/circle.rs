//! Circle repository.
//!
//! Covers circles and their memberships. Creating a circle and enrolling its
//! owner happen in one transaction.

use std::collections::HashMap;
use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, Func},
};

use crate::entities::{Circle, CircleMember, circle, circle_member};
use crate::map_db_err;

/// Member count of one circle.
#[derive(Debug, FromQueryResult)]
struct MemberCount {
    circle_id: String,
    member_count: i64,
}

/// Repository for circle and membership operations.
#[derive(Clone)]
pub struct CircleRepository {
    db: Arc<DatabaseConnection>,
}

impl CircleRepository {
    /// Create a new circle repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get database connection reference.
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Find a circle by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<circle::Model>> {
        Circle::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a circle by ID, failing with `Circle not found`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<circle::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Circle not found".to_string()))
    }

    /// Find circles by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<circle::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Circle::find()
            .filter(circle::Column::Id.is_in(ids.to_vec()))
            .order_by(circle::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a circle by its invitation code.
    pub async fn find_by_invitation_code(&self, code: &str) -> AppResult<Option<circle::Model>> {
        Circle::find()
            .filter(circle::Column::InvitationCode.eq(code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether an invitation code is already taken.
    pub async fn invitation_code_exists(&self, code: &str) -> AppResult<bool> {
        let count = Circle::find()
            .filter(circle::Column::InvitationCode.eq(code))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Insert a circle together with its owner membership.
    ///
    /// Nothing is written unless both rows are. A clash on the invitation
    /// code surfaces as [`AppError::Conflict`].
    pub async fn create_with_owner(
        &self,
        circle: circle::ActiveModel,
        owner: circle_member::ActiveModel,
    ) -> AppResult<(circle::Model, circle_member::Model)> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let circle = circle.insert(&txn).await.map_err(map_db_err)?;
        let owner = owner.insert(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok((circle, owner))
    }

    /// Update a circle.
    pub async fn update(&self, model: circle::ActiveModel) -> AppResult<circle::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a circle. Dependent rows are removed by cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Circle::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// List public circles, most recently touched first.
    pub async fn list_public(&self) -> AppResult<Vec<circle::Model>> {
        Circle::find()
            .filter(circle::Column::IsPublic.eq(true))
            .order_by(circle::Column::UpdatedAt, Order::Desc)
            .order_by(circle::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Case-insensitive substring search over public circle names.
    pub async fn search_public_by_name(&self, query: &str) -> AppResult<Vec<circle::Model>> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        Circle::find()
            .filter(circle::Column::IsPublic.eq(true))
            .filter(Expr::expr(Func::lower(Expr::col(circle::Column::Name))).like(pattern))
            .order_by(circle::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find public circles among the given IDs.
    pub async fn find_public_by_ids(&self, ids: &[String]) -> AppResult<Vec<circle::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Circle::find()
            .filter(circle::Column::Id.is_in(ids.to_vec()))
            .filter(circle::Column::IsPublic.eq(true))
            .order_by(circle::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Member Operations ====================

    /// Get a membership record.
    pub async fn get_member(
        &self,
        circle_id: &str,
        user_id: &str,
    ) -> AppResult<Option<circle_member::Model>> {
        CircleMember::find()
            .filter(circle_member::Column::CircleId.eq(circle_id))
            .filter(circle_member::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add a member. A duplicate membership surfaces as [`AppError::Conflict`].
    pub async fn add_member(
        &self,
        model: circle_member::ActiveModel,
    ) -> AppResult<circle_member::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Remove a member. Returns whether a row was deleted.
    pub async fn remove_member(&self, circle_id: &str, user_id: &str) -> AppResult<bool> {
        let deleted = CircleMember::delete_many()
            .filter(circle_member::Column::CircleId.eq(circle_id))
            .filter(circle_member::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// List members of a circle in join order.
    pub async fn list_members(&self, circle_id: &str) -> AppResult<Vec<circle_member::Model>> {
        CircleMember::find()
            .filter(circle_member::Column::CircleId.eq(circle_id))
            .order_by(circle_member::Column::JoinedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all memberships of a user.
    pub async fn memberships_for_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<circle_member::Model>> {
        CircleMember::find()
            .filter(circle_member::Column::UserId.eq(user_id))
            .order_by(circle_member::Column::JoinedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count members for each of the given circles.
    ///
    /// Circles without members are absent from the map.
    pub async fn member_counts(&self, circle_ids: &[String]) -> AppResult<HashMap<String, i64>> {
        if circle_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = CircleMember::find()
            .select_only()
            .column(circle_member::Column::CircleId)
            .column_as(circle_member::Column::Id.count(), "member_count")
            .filter(circle_member::Column::CircleId.is_in(circle_ids.to_vec()))
            .group_by(circle_member::Column::CircleId)
            .into_model::<MemberCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.circle_id, row.member_count))
            .collect())
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
