//! Paid files: orders and the earnings ledgers.
//!
//! Amounts are integer cents. The platform keeps 0.1% of every sale,
//! rounded half up; the seller is credited the rest.

use chrono::{DateTime, Utc};
use circles_common::{AppError, AppResult, IdGenerator};
use circles_db::entities::payment_order::{self, OrderStatus, PaymentMethod};
use circles_db::entities::user;
use circles_db::repositories::{FileRepository, PaymentRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::admin::PageInput;

const DEFAULT_ORDER_PAGE: u64 = 20;

/// Split a non-negative order amount into `(platform_fee, seller_amount)`.
#[must_use]
pub fn split_amount(amount: i64) -> (i64, i64) {
    let fee = amount / 1000 + i64::from(amount % 1000 >= 500);
    (fee, amount - fee)
}

/// Input for starting a purchase.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub file_id: String,
    pub payment_method: PaymentMethod,
}

/// Newly created order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: String,
    pub amount: i64,
}

/// Input for confirming a payment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrderInput {
    pub order_id: String,
    #[validate(length(min = 1, max = 255))]
    pub transaction_id: String,
}

/// Order as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub file_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub amount: i64,
    pub platform_fee: i64,
    pub seller_amount: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<payment_order::Model> for OrderResponse {
    fn from(model: payment_order::Model) -> Self {
        Self {
            id: model.id,
            file_id: model.file_id,
            buyer_id: model.buyer_id,
            seller_id: model.seller_id,
            amount: model.amount,
            platform_fee: model.platform_fee,
            seller_amount: model.seller_amount,
            payment_method: model.payment_method,
            status: model.status,
            transaction_id: model.transaction_id,
            created_at: model.created_at.into(),
            completed_at: model.completed_at.map(Into::into),
        }
    }
}

/// A seller's earnings. All zero before the first sale.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsResponse {
    pub total_earnings: i64,
    pub withdrawn_amount: i64,
    pub available_amount: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Service for orders and earnings.
#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    file_repo: FileRepository,
    id_gen: IdGenerator,
}

impl PaymentService {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(payment_repo: PaymentRepository, file_repo: FileRepository) -> Self {
        Self {
            payment_repo,
            file_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Open a pending order for a paid file.
    pub async fn create_order(&self, buyer_id: &str, input: CreateOrderInput) -> AppResult<OrderCreated> {
        let file = self.file_repo.get_by_id(&input.file_id).await?;

        let amount = file
            .sale_price()
            .ok_or_else(|| AppError::BadRequest("This file is not for sale".to_string()))?;

        if file.uploader_id == buyer_id
            || self
                .payment_repo
                .find_completed_for_buyer(&file.id, buyer_id)
                .await?
                .is_some()
        {
            return Err(AppError::BadRequest("You already own this file".to_string()));
        }

        let (platform_fee, seller_amount) = split_amount(amount);

        let model = payment_order::ActiveModel {
            id: Set(self.id_gen.generate()),
            file_id: Set(file.id),
            buyer_id: Set(buyer_id.to_string()),
            seller_id: Set(file.uploader_id),
            amount: Set(amount),
            platform_fee: Set(platform_fee),
            seller_amount: Set(seller_amount),
            payment_method: Set(input.payment_method),
            status: Set(OrderStatus::Pending),
            transaction_id: Set(None),
            created_at: Set(Utc::now().into()),
            completed_at: Set(None),
        };

        let order = self.payment_repo.create_order(model).await?;
        info!(order_id = %order.id, amount, "Created payment order");

        Ok(OrderCreated {
            order_id: order.id,
            amount: order.amount,
        })
    }

    /// An order, visible to its buyer and seller.
    pub async fn get_order(&self, user_id: &str, order_id: &str) -> AppResult<OrderResponse> {
        let order = self.payment_repo.get_order(order_id).await?;

        if order.buyer_id != user_id && order.seller_id != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to view this order".to_string(),
            ));
        }

        Ok(order.into())
    }

    /// Confirm payment of a pending order. Buyer or admin only.
    pub async fn complete_order(
        &self,
        caller: &user::Model,
        input: CompleteOrderInput,
    ) -> AppResult<OrderResponse> {
        input.validate()?;

        let order = self.payment_repo.get_order(&input.order_id).await?;

        if order.buyer_id != caller.id && !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Not authorized to complete this order".to_string(),
            ));
        }

        let completed = self
            .payment_repo
            .complete_order(&order.id, &input.transaction_id, Utc::now().into())
            .await?;

        info!(
            order_id = %completed.id,
            seller_id = %completed.seller_id,
            seller_amount = completed.seller_amount,
            platform_fee = completed.platform_fee,
            "Completed payment order"
        );

        Ok(completed.into())
    }

    /// The caller's earnings ledger.
    pub async fn user_earnings(&self, user_id: &str) -> AppResult<EarningsResponse> {
        Ok(self
            .payment_repo
            .find_user_earnings(user_id)
            .await?
            .map(|e| EarningsResponse {
                total_earnings: e.total_earnings,
                withdrawn_amount: e.withdrawn_amount,
                available_amount: e.available_amount,
                updated_at: Some(e.updated_at.into()),
            })
            .unwrap_or_default())
    }

    /// Orders the caller sold.
    pub async fn seller_orders(&self, user_id: &str, page: &PageInput) -> AppResult<Vec<OrderResponse>> {
        let (limit, offset) = page.resolve(DEFAULT_ORDER_PAGE);
        Ok(self
            .payment_repo
            .list_by_seller(user_id, limit, offset)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Orders the caller placed.
    pub async fn buyer_orders(&self, user_id: &str, page: &PageInput) -> AppResult<Vec<OrderResponse>> {
        let (limit, offset) = page.resolve(DEFAULT_ORDER_PAGE);
        Ok(self
            .payment_repo
            .list_by_buyer(user_id, limit, offset)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::file::MAX_PRICE_CENTS;
    use circles_db::entities::file::{self, FileType};
    use circles_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> PaymentService {
        let db = Arc::new(db);
        PaymentService::new(PaymentRepository::new(db.clone()), FileRepository::new(db))
    }

    fn create_test_file(price: Option<i64>) -> file::Model {
        file::Model {
            id: "f1".to_string(),
            circle_id: "c1".to_string(),
            folder_id: None,
            uploader_id: "alice".to_string(),
            filename: "lecture.mp4".to_string(),
            file_key: "circles/c1/alice-x.mp4".to_string(),
            file_url: "/files/circles/c1/alice-x.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
            file_size: 2048,
            file_type: FileType::Video,
            is_paid: price.is_some(),
            price,
            uploaded_at: Utc::now().into(),
        }
    }

    fn create_test_order(status: OrderStatus) -> payment_order::Model {
        payment_order::Model {
            id: "o1".to_string(),
            file_id: "f1".to_string(),
            buyer_id: "bob".to_string(),
            seller_id: "alice".to_string(),
            amount: 10_000,
            platform_fee: 10,
            seller_amount: 9_990,
            payment_method: PaymentMethod::Alipay,
            status,
            transaction_id: None,
            created_at: Utc::now().into(),
            completed_at: None,
        }
    }

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            open_id: format!("oid-{id}"),
            name: None,
            email: None,
            login_method: None,
            role,
            token: None,
            is_disabled: false,
            created_at: Utc::now().into(),
            updated_at: None,
            last_signed_in_at: None,
        }
    }

    #[test]
    fn test_split_amount() {
        assert_eq!(split_amount(10_000), (10, 9_990));
        assert_eq!(split_amount(1_500), (2, 1_498));
        assert_eq!(split_amount(1_499), (1, 1_498));
        assert_eq!(split_amount(499), (0, 499));
        assert_eq!(split_amount(500), (1, 499));
    }

    #[test]
    fn test_split_amount_at_extremes() {
        for amount in [MAX_PRICE_CENTS, i64::MAX - 100, i64::MAX] {
            let (fee, seller) = split_amount(amount);
            assert_eq!(fee + seller, amount);
            assert!(fee >= 0 && seller >= 0);
        }
        assert_eq!(split_amount(MAX_PRICE_CENTS), (10_000_000, 9_989_999_999));
    }

    #[tokio::test]
    async fn test_create_order_for_free_file_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file(None)]])
            .into_connection();

        let result = service(db)
            .create_order(
                "bob",
                CreateOrderInput {
                    file_id: "f1".to_string(),
                    payment_method: PaymentMethod::Wechat,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "This file is not for sale"));
    }

    #[tokio::test]
    async fn test_uploader_cannot_buy_own_file() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file(Some(10_000))]])
            .into_connection();

        let result = service(db)
            .create_order(
                "alice",
                CreateOrderInput {
                    file_id: "f1".to_string(),
                    payment_method: PaymentMethod::Wechat,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "You already own this file"));
    }

    #[tokio::test]
    async fn test_repurchase_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file(Some(10_000))]])
            .append_query_results([[create_test_order(OrderStatus::Completed)]])
            .into_connection();

        let result = service(db)
            .create_order(
                "bob",
                CreateOrderInput {
                    file_id: "f1".to_string(),
                    payment_method: PaymentMethod::Alipay,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file(Some(10_000))]])
            .append_query_results([Vec::<payment_order::Model>::new()])
            .append_query_results([[create_test_order(OrderStatus::Pending)]])
            .into_connection();

        let created = service(db)
            .create_order(
                "bob",
                CreateOrderInput {
                    file_id: "f1".to_string(),
                    payment_method: PaymentMethod::Alipay,
                },
            )
            .await
            .unwrap();

        assert_eq!(created.order_id, "o1");
        assert_eq!(created.amount, 10_000);
    }

    #[tokio::test]
    async fn test_get_order_hidden_from_third_parties() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_order(OrderStatus::Pending)]])
            .into_connection();

        let result = service(db).get_order("carol", "o1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_complete_order_by_stranger_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_order(OrderStatus::Pending)]])
            .into_connection();

        let result = service(db)
            .complete_order(
                &create_test_user("carol", UserRole::User),
                CompleteOrderInput {
                    order_id: "o1".to_string(),
                    transaction_id: "tx-1".to_string(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(AppError::Forbidden(msg)) if msg == "Not authorized to complete this order")
        );
    }

    #[tokio::test]
    async fn test_complete_order_by_buyer() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_order(OrderStatus::Pending)]])
            .append_query_results([[create_test_order(OrderStatus::Pending)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let order = service(db)
            .complete_order(
                &create_test_user("bob", UserRole::User),
                CompleteOrderInput {
                    order_id: "o1".to_string(),
                    transaction_id: "tx-1".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.transaction_id.as_deref(), Some("tx-1"));
    }

    #[tokio::test]
    async fn test_user_earnings_default_to_zero() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<circles_db::entities::user_earnings::Model>::new()])
            .into_connection();

        let earnings = service(db).user_earnings("newcomer").await.unwrap();

        assert_eq!(earnings.total_earnings, 0);
        assert_eq!(earnings.available_amount, 0);
        assert!(earnings.updated_at.is_none());
    }
}
