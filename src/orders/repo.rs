use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;

use crate::catalog::repo::Product;

/// Durable record of a checkout. Totals are frozen at checkout time and
/// never recomputed; the row is immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub added_at: OffsetDateTime,
    pub total_price: f64,
    pub shipping_cost: f64,
}

impl Order {
    /// Insert the order shell with zeroed totals; checkout fills them in
    /// after walking the cart lines.
    pub async fn create_tx(tx: &mut Transaction<'_, Postgres>, user_id: i64) -> anyhow::Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, total_price, shipping_cost)
            VALUES ($1, 0, 0)
            RETURNING id, user_id, added_at, total_price, shipping_cost
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(order)
    }

    pub async fn link_product_tx(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        product_id: i64,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO order_product (order_id, product_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn set_totals_tx(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        total_price: f64,
        shipping_cost: f64,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET total_price = $2, shipping_cost = $3
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .bind(total_price)
        .bind(shipping_cost)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// The order's product snapshot, in the order the lines were linked.
    pub async fn fetch_products_tx(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
    ) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.category,
                   p.release_date, p.added_at, p.image_url, p.score
            FROM order_product op
            JOIN products p ON p.id = op.product_id
            WHERE op.order_id = $1
            ORDER BY op.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, added_at, total_price, shipping_cost
            FROM orders
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn fetch_products(db: &PgPool, order_id: i64) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.category,
                   p.release_date, p.added_at, p.image_url, p.score
            FROM order_product op
            JOIN products p ON p.id = op.product_id
            WHERE op.order_id = $1
            ORDER BY op.id
            "#,
        )
        .bind(order_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
