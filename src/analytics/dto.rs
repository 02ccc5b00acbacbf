use serde::Serialize;

use crate::analytics::repo::{CategoryRevenue, DailyRevenue, ProductUnits};

/// Aggregate sales report: revenue over time, revenue by category and the
/// ten best-selling products.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub message: String,
    pub status_code: u16,
    pub sales_by_date: Vec<DailyRevenue>,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub best_sellers: Vec<ProductUnits>,
}
