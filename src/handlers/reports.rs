use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use std::str::FromStr;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::services::reports::{ReportRange, ShopSummaryReport};
use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Shop to report on
    pub shop_id: Uuid,
    /// Range selector: "today" (default), "this_week" or "this_month"
    pub range: Option<String>,
}

fn parse_range(raw: Option<&str>) -> Result<ReportRange, ServiceError> {
    match raw {
        None => Ok(ReportRange::Today),
        Some(value) => ReportRange::from_str(value).map_err(|_| {
            ServiceError::ValidationError(format!(
                "range must be one of \"today\", \"this_week\" or \"this_month\", got \"{}\"",
                value
            ))
        }),
    }
}

/// Dashboard summary for one shop
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    summary = "Shop summary report",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Counts, revenue, weekday series and recent orders", body = ApiResponse<ShopSummaryReport>),
        (status = 400, description = "Invalid query parameters", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shop not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Reports"
)]
pub async fn shop_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<ShopSummaryReport>>, ServiceError> {
    let range = parse_range(query.range.as_deref())?;
    let report = state
        .services
        .reports
        .shop_summary(query.shop_id, range)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}
