use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::CurrentUser;
use crate::cart::{dto::CartResponse, repo::Cart, services};
use crate::catalog::repo::Product;
use crate::error::{ApiError, ApiMessage};
use crate::state::AppState;

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/add-to-cart/:product_id", post(add_to_cart))
        .route("/cart/remove-from-cart/:product_id", post(remove_from_cart))
        .route("/cart/checkout", post(checkout))
}

#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiMessage>, ApiError> {
    let product = Product::find_by_id(&state.db, product_id)
        .await?
        .ok_or(ApiError::ProductNotFound)?;

    let cart = Cart::get_or_create(&state.db, user_id).await?;
    Cart::link_product(&state.db, cart.id, product.id).await?;

    info!(%user_id, %product_id, cart_id = %cart.id, "product added to cart");
    Ok(Json(ApiMessage::new(
        "Product added to cart successfully",
        StatusCode::OK,
    )))
}

#[instrument(skip(state))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiMessage>, ApiError> {
    let product = Product::find_by_id(&state.db, product_id)
        .await?
        .ok_or(ApiError::ProductNotFound)?;

    // Removal still creates the cart row when none exists yet
    let cart = Cart::get_or_create(&state.db, user_id).await?;
    let removed = Cart::unlink_one_product(&state.db, cart.id, product.id).await?;
    if !removed {
        return Err(ApiError::NotInCart);
    }

    info!(%user_id, %product_id, cart_id = %cart.id, "product removed from cart");
    Ok(Json(ApiMessage::new(
        "Product removed from cart successfully",
        StatusCode::OK,
    )))
}

#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<CartResponse>, ApiError> {
    // Side-effect-free read: a missing cart yields an empty view instead
    // of writing a row.
    let Some(cart) = Cart::find_by_user(&state.db, user_id).await? else {
        return Ok(Json(CartResponse::empty()));
    };

    let products = Cart::fetch_products(&state.db, cart.id).await?;
    let (total_price, shipping_cost) = services::cart_totals(&products);

    Ok(Json(CartResponse {
        message: "Cart found".into(),
        status_code: StatusCode::OK.as_u16(),
        cart_id: Some(cart.id),
        total_items: products.len(),
        products,
        total_price,
        shipping_cost,
    }))
}

#[instrument(skip(state))]
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiMessage>, ApiError> {
    services::checkout(&state.db, user_id).await?;
    Ok(Json(ApiMessage::new("Checkout successfully", StatusCode::OK)))
}
