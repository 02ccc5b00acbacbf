use serde::Serialize;
use time::OffsetDateTime;

use crate::catalog::repo::Product;

/// One order with its frozen totals and product snapshot.
#[derive(Debug, Serialize)]
pub struct OrderDetails {
    pub id: i64,
    pub added_at: OffsetDateTime,
    pub total_price: f64,
    pub shipping_cost: f64,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub message: String,
    pub status_code: u16,
    pub orders: Vec<OrderDetails>,
}
