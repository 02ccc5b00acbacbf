use serde::Serialize;

use crate::catalog::repo::Product;

/// Cart read view. `cart_id` is null when the user has no cart row yet:
/// reads never create one.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub status_code: u16,
    pub cart_id: Option<i64>,
    pub products: Vec<Product>,
    pub total_price: f64,
    pub shipping_cost: f64,
    pub total_items: usize,
}

impl CartResponse {
    pub fn empty() -> Self {
        Self {
            message: "Cart found".into(),
            status_code: 200,
            cart_id: None,
            products: Vec::new(),
            total_price: 0.0,
            shipping_cost: 0.0,
            total_items: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_has_zero_totals_and_no_id() {
        let view = CartResponse::empty();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["cart_id"], serde_json::Value::Null);
        assert_eq!(json["total_items"], 0);
        assert_eq!(json["total_price"], 0.0);
        assert_eq!(json["shipping_cost"], 0.0);
        assert_eq!(json["products"], serde_json::json!([]));
    }
}
