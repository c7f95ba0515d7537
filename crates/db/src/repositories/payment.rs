//! Payment repository.
//!
//! Orders plus the two earnings ledgers they feed. Completing an order flips
//! its status and credits both ledgers in a single transaction.

use std::sync::Arc;

use circles_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, OnConflict},
};

use crate::entities::{
    PaymentOrder, PlatformEarnings, UserEarnings, payment_order,
    payment_order::OrderStatus, platform_earnings, user_earnings,
};
use crate::map_db_err;

/// Ledger key of the month `at` falls in, e.g. `2025-03`.
#[must_use]
pub fn earnings_month(at: &DateTimeWithTimeZone) -> String {
    at.format("%Y-%m").to_string()
}

/// Repository for payment orders and earnings.
#[derive(Clone)]
pub struct PaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl PaymentRepository {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a pending order.
    pub async fn create_order(
        &self,
        model: payment_order::ActiveModel,
    ) -> AppResult<payment_order::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Find an order by ID.
    pub async fn find_order(&self, id: &str) -> AppResult<Option<payment_order::Model>> {
        PaymentOrder::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an order by ID, failing with `Order not found`.
    pub async fn get_order(&self, id: &str) -> AppResult<payment_order::Model> {
        self.find_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Find a completed purchase of a file by a buyer.
    pub async fn find_completed_for_buyer(
        &self,
        file_id: &str,
        buyer_id: &str,
    ) -> AppResult<Option<payment_order::Model>> {
        PaymentOrder::find()
            .filter(payment_order::Column::FileId.eq(file_id))
            .filter(payment_order::Column::BuyerId.eq(buyer_id))
            .filter(payment_order::Column::Status.eq(OrderStatus::Completed))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Orders where the user is the seller, newest first.
    pub async fn list_by_seller(
        &self,
        seller_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<payment_order::Model>> {
        PaymentOrder::find()
            .filter(payment_order::Column::SellerId.eq(seller_id))
            .order_by(payment_order::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Orders where the user is the buyer, newest first.
    pub async fn list_by_buyer(
        &self,
        buyer_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<payment_order::Model>> {
        PaymentOrder::find()
            .filter(payment_order::Column::BuyerId.eq(buyer_id))
            .order_by(payment_order::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Complete a pending order and credit both ledgers.
    ///
    /// Fails with `Order is not pending` when another caller completed the
    /// order first; nothing is written in that case.
    pub async fn complete_order(
        &self,
        order_id: &str,
        transaction_id: &str,
        now: DateTimeWithTimeZone,
    ) -> AppResult<payment_order::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let order = PaymentOrder::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let updated = PaymentOrder::update_many()
            .col_expr(payment_order::Column::Status, Expr::value(OrderStatus::Completed))
            .col_expr(
                payment_order::Column::TransactionId,
                Expr::value(transaction_id),
            )
            .col_expr(payment_order::Column::CompletedAt, Expr::value(now))
            .filter(payment_order::Column::Id.eq(order_id))
            .filter(payment_order::Column::Status.eq(OrderStatus::Pending))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if updated.rows_affected == 0 {
            return Err(AppError::BadRequest("Order is not pending".to_string()));
        }

        let seller_credit = user_earnings::ActiveModel {
            user_id: Set(order.seller_id.clone()),
            total_earnings: Set(order.seller_amount),
            withdrawn_amount: Set(0),
            available_amount: Set(order.seller_amount),
            updated_at: Set(now),
        };
        UserEarnings::insert(seller_credit)
            .on_conflict(
                OnConflict::column(user_earnings::Column::UserId)
                    .value(
                        user_earnings::Column::TotalEarnings,
                        Expr::col((UserEarnings, user_earnings::Column::TotalEarnings))
                            .add(order.seller_amount),
                    )
                    .value(
                        user_earnings::Column::AvailableAmount,
                        Expr::col((UserEarnings, user_earnings::Column::AvailableAmount))
                            .add(order.seller_amount),
                    )
                    .value(user_earnings::Column::UpdatedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(map_db_err)?;

        let platform_credit = platform_earnings::ActiveModel {
            month: Set(earnings_month(&now)),
            total_earnings: Set(order.platform_fee),
            transaction_count: Set(1),
            updated_at: Set(now),
        };
        PlatformEarnings::insert(platform_credit)
            .on_conflict(
                OnConflict::column(platform_earnings::Column::Month)
                    .value(
                        platform_earnings::Column::TotalEarnings,
                        Expr::col((PlatformEarnings, platform_earnings::Column::TotalEarnings))
                            .add(order.platform_fee),
                    )
                    .value(
                        platform_earnings::Column::TransactionCount,
                        Expr::col((
                            PlatformEarnings,
                            platform_earnings::Column::TransactionCount,
                        ))
                        .add(1),
                    )
                    .value(platform_earnings::Column::UpdatedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(payment_order::Model {
            status: OrderStatus::Completed,
            transaction_id: Some(transaction_id.to_string()),
            completed_at: Some(now),
            ..order
        })
    }

    /// Earnings ledger of a user, if they ever sold anything.
    pub async fn find_user_earnings(
        &self,
        user_id: &str,
    ) -> AppResult<Option<user_earnings::Model>> {
        UserEarnings::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Platform fee ledger for one month.
    pub async fn find_platform_earnings(
        &self,
        month: &str,
    ) -> AppResult<Option<platform_earnings::Model>> {
        PlatformEarnings::find_by_id(month)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Platform fee ledger for every month, latest first.
    pub async fn list_platform_earnings(&self) -> AppResult<Vec<platform_earnings::Model>> {
        PlatformEarnings::find()
            .order_by(platform_earnings::Column::Month, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
