use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use crate::analytics::{dto::ReportResponse, repo::SalesRecord};
use crate::error::ApiError;
use crate::state::AppState;

const BEST_SELLERS_LIMIT: i64 = 10;

pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/analytics/report", get(report))
}

#[instrument(skip(state))]
pub async fn report(State(state): State<AppState>) -> Result<Json<ReportResponse>, ApiError> {
    let sales_by_date = SalesRecord::revenue_by_date(&state.db).await?;
    let revenue_by_category = SalesRecord::revenue_by_category(&state.db).await?;
    let best_sellers = SalesRecord::best_sellers(&state.db, BEST_SELLERS_LIMIT).await?;

    Ok(Json(ReportResponse {
        message: "Sales report".into(),
        status_code: StatusCode::OK.as_u16(),
        sales_by_date,
        revenue_by_category,
        best_sellers,
    }))
}
