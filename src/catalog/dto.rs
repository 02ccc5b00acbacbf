use serde::{Deserialize, Serialize};

use crate::catalog::repo::Product;

/// Query string for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub start: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_type")]
    pub sort_type: String,
}

fn default_limit() -> i64 {
    10
}
fn default_sort_by() -> String {
    "name".into()
}
fn default_sort_type() -> String {
    "asc".into()
}

#[derive(Debug, Serialize)]
pub struct ProductPageResponse {
    pub message: String,
    pub status_code: u16,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub status_code: u16,
    pub product: Product,
}
