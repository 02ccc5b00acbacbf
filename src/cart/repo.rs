use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;

use crate::catalog::repo::Product;

/// Per-user cart container. At most one row per user; the row is deleted
/// when a checkout consumes it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub added_at: OffsetDateTime,
}

impl Cart {
    pub async fn find_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, user_id, added_at
            FROM cart
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(cart)
    }

    /// Lazily create the user's cart on first mutation. The unique
    /// constraint on user_id keeps this race-safe: a concurrent insert
    /// loses the conflict and the existing row is returned.
    pub async fn get_or_create(db: &PgPool, user_id: i64) -> anyhow::Result<Cart> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO cart (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, added_at
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(cart)
    }

    /// Append one product line. Duplicates are allowed: adding the same
    /// product twice produces two lines.
    pub async fn link_product(db: &PgPool, cart_id: i64, product_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_product (cart_id, product_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Remove exactly one line for the product. Returns false when the
    /// product is not linked to the cart.
    pub async fn unlink_one_product(
        db: &PgPool,
        cart_id: i64,
        product_id: i64,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_product
            WHERE id = (
                SELECT id FROM cart_product
                WHERE cart_id = $1 AND product_id = $2
                ORDER BY id
                LIMIT 1
            )
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Live product rows for the cart, in insertion order. Prices and
    /// scores reflect the current catalog state, not a snapshot.
    pub async fn fetch_products(db: &PgPool, cart_id: i64) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.category,
                   p.release_date, p.added_at, p.image_url, p.score
            FROM cart_product cp
            JOIN products p ON p.id = cp.product_id
            WHERE cp.cart_id = $1
            ORDER BY cp.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Transaction-scoped variant used by checkout.
    pub async fn fetch_products_tx(
        tx: &mut Transaction<'_, Postgres>,
        cart_id: i64,
    ) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.category,
                   p.release_date, p.added_at, p.image_url, p.score
            FROM cart_product cp
            JOIN products p ON p.id = cp.product_id
            WHERE cp.cart_id = $1
            ORDER BY cp.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows)
    }

    /// Drop the cart row; the links cascade away with it.
    pub async fn delete_tx(tx: &mut Transaction<'_, Postgres>, cart_id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM cart WHERE id = $1")
            .bind(cart_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
