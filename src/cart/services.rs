use sqlx::PgPool;
use tracing::{info, instrument};

use crate::analytics::repo::SalesRecord;
use crate::cart::repo::Cart;
use crate::catalog::repo::Product;
use crate::error::ApiError;
use crate::orders::repo::Order;

pub const SHIPPING_PER_ITEM: f64 = 10.0;
pub const SHIPPING_FREE_THRESHOLD: f64 = 250.0;

/// Shipping for a cart read: flat 10 per line, capped at the threshold.
/// The threshold compares against the shipping subtotal, not the order
/// subtotal.
pub fn cart_shipping(item_count: usize) -> f64 {
    if item_count == 0 {
        return 0.0;
    }
    (SHIPPING_PER_ITEM * item_count as f64).min(SHIPPING_FREE_THRESHOLD)
}

/// Cart totals are never stored; they are recomputed from live product
/// rows on every read.
pub fn cart_totals(products: &[Product]) -> (f64, f64) {
    let shipping = cart_shipping(products.len());
    let total: f64 = products.iter().map(|p| p.price).sum::<f64>() + shipping;
    (total, shipping)
}

/// Shipping frozen onto an order: the accumulated flat rate, but free once
/// it passes the threshold.
pub fn checkout_shipping(accumulated: f64) -> f64 {
    if accumulated > SHIPPING_FREE_THRESHOLD {
        0.0
    } else {
        accumulated
    }
}

/// Convert the user's cart into an order. Steps 2-6 run inside a single
/// transaction: on any failure the transaction is dropped and rolled back,
/// so no partial checkout is ever observable.
#[instrument(skip(db))]
pub async fn checkout(db: &PgPool, user_id: i64) -> Result<i64, ApiError> {
    let cart = Cart::find_by_user(db, user_id)
        .await?
        .ok_or(ApiError::EmptyCart)?;

    let mut tx = db.begin().await?;

    let order = Order::create_tx(&mut tx, user_id).await?;
    let cart_products = Cart::fetch_products_tx(&mut tx, cart.id).await?;

    let mut price_sum = 0.0;
    let mut shipping_acc = 0.0;
    for product in &cart_products {
        price_sum += product.price;
        shipping_acc += SHIPPING_PER_ITEM;
        Order::link_product_tx(&mut tx, order.id, product.id).await?;
    }

    let shipping = checkout_shipping(shipping_acc);
    Order::set_totals_tx(&mut tx, order.id, price_sum + shipping, shipping).await?;

    // The cart is fully consumed; a later read sees no cart at all.
    Cart::delete_tx(&mut tx, cart.id).await?;

    // Sales records come from the order's final product list, one per line.
    let order_products = Order::fetch_products_tx(&mut tx, order.id).await?;
    SalesRecord::insert_batch_tx(&mut tx, &order_products).await?;

    tx.commit().await?;

    info!(%user_id, order_id = %order.id, items = cart_products.len(), "checkout committed");
    Ok(order.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn product(price: f64) -> Product {
        Product {
            id: 1,
            name: "game".into(),
            description: "desc".into(),
            price,
            category: "games".into(),
            release_date: OffsetDateTime::UNIX_EPOCH,
            added_at: OffsetDateTime::UNIX_EPOCH,
            image_url: "http://img".into(),
            score: 4.5,
        }
    }

    #[test]
    fn empty_cart_ships_for_free() {
        assert_eq!(cart_shipping(0), 0.0);
    }

    #[test]
    fn single_item_ships_at_flat_rate() {
        assert_eq!(cart_shipping(1), 10.0);
    }

    #[test]
    fn cart_shipping_caps_at_threshold() {
        assert_eq!(cart_shipping(25), 250.0);
        assert_eq!(cart_shipping(26), 250.0);
        assert_eq!(cart_shipping(100), 250.0);
    }

    #[test]
    fn single_item_total_is_price_plus_shipping() {
        let (total, shipping) = cart_totals(&[product(10.0)]);
        assert_eq!(shipping, 10.0);
        assert_eq!(total, 20.0);
    }

    #[test]
    fn identical_items_follow_the_formula() {
        // N items at price p: shipping = min(10N, 250), total = N*p + shipping
        for n in [1usize, 5, 24, 25, 26, 40] {
            let p = 7.5;
            let items: Vec<Product> = (0..n).map(|_| product(p)).collect();
            let (total, shipping) = cart_totals(&items);
            let expected_shipping = (10.0 * n as f64).min(250.0);
            assert_eq!(shipping, expected_shipping);
            assert_eq!(total, n as f64 * p + expected_shipping);
        }
    }

    #[test]
    fn checkout_shipping_is_free_past_threshold() {
        assert_eq!(checkout_shipping(250.0), 250.0);
        assert_eq!(checkout_shipping(260.0), 0.0);
        assert_eq!(checkout_shipping(10.0), 10.0);
    }
}
