use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use time::Date;

use crate::catalog::repo::Product;

/// Revenue summed per calendar day.
#[derive(Debug, Serialize, FromRow)]
pub struct DailyRevenue {
    pub sale_date: Date,
    pub revenue: f64,
}

/// Revenue summed per product category.
#[derive(Debug, Serialize, FromRow)]
pub struct CategoryRevenue {
    pub category: Option<String>,
    pub revenue: f64,
}

/// Units sold per product.
#[derive(Debug, Serialize, FromRow)]
pub struct ProductUnits {
    pub product_id: i64,
    pub units: i64,
}

/// Append-only, anonymized sales log. One row per product unit sold; no
/// foreign keys, so catalog deletions never touch it.
pub struct SalesRecord;

impl SalesRecord {
    /// One record per purchased line, written as a single batch inside the
    /// checkout transaction.
    pub async fn insert_batch_tx(
        tx: &mut Transaction<'_, Postgres>,
        products: &[Product],
    ) -> anyhow::Result<()> {
        if products.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO sales_record (product_id, product_price, product_category) ",
        );
        builder.push_values(products, |mut b, p| {
            b.push_bind(p.id).push_bind(p.price).push_bind(&p.category);
        });
        builder.build().execute(&mut **tx).await?;
        Ok(())
    }

    pub async fn revenue_by_date(db: &PgPool) -> anyhow::Result<Vec<DailyRevenue>> {
        let rows = sqlx::query_as::<_, DailyRevenue>(
            r#"
            SELECT sale_date::date AS sale_date, SUM(product_price) AS revenue
            FROM sales_record
            GROUP BY sale_date::date
            ORDER BY sale_date::date
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn revenue_by_category(db: &PgPool) -> anyhow::Result<Vec<CategoryRevenue>> {
        let rows = sqlx::query_as::<_, CategoryRevenue>(
            r#"
            SELECT product_category AS category, SUM(product_price) AS revenue
            FROM sales_record
            GROUP BY product_category
            ORDER BY revenue DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn best_sellers(db: &PgPool, limit: i64) -> anyhow::Result<Vec<ProductUnits>> {
        let rows = sqlx::query_as::<_, ProductUnits>(
            r#"
            SELECT product_id, COUNT(*) AS units
            FROM sales_record
            GROUP BY product_id
            ORDER BY units DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
