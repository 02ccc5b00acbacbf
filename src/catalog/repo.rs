use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Catalog entry. Lives independently of carts and orders: rows may be
/// deleted even when historically referenced.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub release_date: OffsetDateTime,
    pub added_at: OffsetDateTime,
    pub image_url: String,
    pub score: f64,
}

impl Product {
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, release_date, added_at, image_url, score
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, release_date, added_at, image_url, score
            FROM products
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    /// One page of the catalog in id order. Sorting happens in memory on
    /// the page afterwards.
    pub async fn list_page(db: &PgPool, start: i64, limit: i64) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, release_date, added_at, image_url, score
            FROM products
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(start)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
