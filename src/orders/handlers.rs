use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use crate::auth::extractors::CurrentUser;
use crate::error::ApiError;
use crate::orders::{
    dto::{OrderDetails, OrdersResponse},
    repo::Order,
};
use crate::state::AppState;

pub fn orders_routes() -> Router<AppState> {
    Router::new().route("/orders", get(get_orders))
}

/// Full order history for the principal; no pagination at this scale.
#[instrument(skip(state))]
pub async fn get_orders(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = Order::list_by_user(&state.db, user_id).await?;

    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        let products = Order::fetch_products(&state.db, order.id).await?;
        details.push(OrderDetails {
            id: order.id,
            added_at: order.added_at,
            total_price: order.total_price,
            shipping_cost: order.shipping_cost,
            products,
        });
    }

    Ok(Json(OrdersResponse {
        message: "Orders found".into(),
        status_code: StatusCode::OK.as_u16(),
        orders: details,
    }))
}
