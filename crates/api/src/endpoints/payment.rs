//! Payment endpoints.

use axum::{Json, Router, extract::State, routing::post};
use circles_common::AppResult;
use circles_core::{
    CompleteOrderInput, CreateOrderInput, EarningsResponse, OrderCreated, OrderResponse,
    PageInput,
};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create payment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createOrder", post(create_order))
        .route("/getOrder", post(get_order))
        .route("/completeOrder", post(complete_order))
        .route("/getUserEarnings", post(get_user_earnings))
        .route("/getSellerOrders", post(get_seller_orders))
        .route("/getBuyerOrders", post(get_buyer_orders))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderIdRequest {
    order_id: String,
}

async fn create_order(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<ApiResponse<OrderCreated>> {
    let order = state.payment_service.create_order(&user.id, input).await?;
    Ok(ApiResponse::ok(order))
}

async fn get_order(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<OrderIdRequest>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.payment_service.get_order(&user.id, &req.order_id).await?;
    Ok(ApiResponse::ok(order))
}

async fn complete_order(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CompleteOrderInput>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.payment_service.complete_order(&user, input).await?;
    Ok(ApiResponse::ok(order))
}

async fn get_user_earnings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<EarningsResponse>> {
    let earnings = state.payment_service.user_earnings(&user.id).await?;
    Ok(ApiResponse::ok(earnings))
}

async fn get_seller_orders(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(page): Json<PageInput>,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let orders = state.payment_service.seller_orders(&user.id, &page).await?;
    Ok(ApiResponse::ok(orders))
}

async fn get_buyer_orders(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(page): Json<PageInput>,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let orders = state.payment_service.buyer_orders(&user.id, &page).await?;
    Ok(ApiResponse::ok(orders))
}
