use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::catalog::{
    dto::{ListParams, ProductPageResponse, ProductResponse},
    repo::Product,
    services::{sort_products, SortDir, SortField, MAX_PAGE_SIZE},
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog/products", get(list_products))
        .route("/catalog/products/:id", get(get_product_by_id))
        .route("/catalog/products/by-name/:name", get(get_product_by_name))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProductPageResponse>, ApiError> {
    let sort_by = SortField::parse(&params.sort_by.to_lowercase())?;
    let sort_type = SortDir::parse(&params.sort_type.to_lowercase())?;

    let limit = params.limit.min(MAX_PAGE_SIZE);
    let mut products = Product::list_page(&state.db, params.start, limit).await?;

    if products.is_empty() {
        return Ok(Json(ProductPageResponse {
            message: "No products found".into(),
            status_code: StatusCode::OK.as_u16(),
            products,
        }));
    }

    sort_products(&mut products, sort_by, sort_type);

    Ok(Json(ProductPageResponse {
        message: "Products found".into(),
        status_code: StatusCode::OK.as_u16(),
        products,
    }))
}

#[instrument(skip(state))]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::ProductNotFound)?;

    Ok(Json(ProductResponse {
        message: "Product found".into(),
        status_code: StatusCode::OK.as_u16(),
        product,
    }))
}

#[instrument(skip(state))]
pub async fn get_product_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = Product::find_by_name(&state.db, &name)
        .await?
        .ok_or(ApiError::ProductNotFound)?;

    Ok(Json(ProductResponse {
        message: "Product found".into(),
        status_code: StatusCode::OK.as_u16(),
        product,
    }))
}
