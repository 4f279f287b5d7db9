//! Order Handlers
//!
//! The owner always comes from [`CurrentUser`], never from the request body.

use axum::extract::{Path, State};
use shared::client::{CreateOrderRequest, ListOrdersQuery, OrderCreated, OrderListData};

use crate::api::extract::{ApiJson, ApiQuery};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::{ApiResponse, AppResult};

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> AppResult<ApiResponse<OrderCreated>> {
    let order = state.order_service.create(req, user.id).await?;

    Ok(ApiResponse::success_with_message(
        "Order Created Successfully",
        OrderCreated {
            consignment_id: order.consignment_id,
            merchant_order_id: order.merchant_order_id,
            order_status: order.status.to_string(),
            delivery_fee: order.delivery_fee,
        },
    ))
}

/// GET /api/orders?limit=&page=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> AppResult<ApiResponse<OrderListData>> {
    let (page, limit, current_page) = state
        .order_service
        .list(user.id, query.limit, query.page)
        .await?;

    let last_page = page.last_page(limit);
    let total_in_page = page.orders.len() as i64;

    Ok(ApiResponse::success_with_message(
        "Orders successfully fetched",
        OrderListData {
            orders: page.orders,
            total: page.total,
            current_page,
            per_page: limit,
            total_in_page,
            last_page,
        },
    ))
}

/// POST /api/orders/{consignment_id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(consignment_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .order_service
        .cancel(&consignment_id, user.id)
        .await?;
    Ok(ApiResponse::ok_with_message("Order Cancelled Successfully"))
}
