use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{OrderStatus, ProcessingStep};
use crate::services::order_status::{ProcessingRecord, StatusRecord};
use crate::services::orders::{OrderDetail, OrderSummary, SortDirection, WeightAmendment};
use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// Restrict the listing to one shop
    pub shop_id: Option<Uuid>,
    /// Creation-time ordering: "asc" or "desc" (default)
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
    pub reason: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RecordProcessingStepRequest {
    #[validate(length(min = 1, message = "step is required"))]
    pub step: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AmendWeightRequest {
    pub weight_kg: Decimal,
}

fn parse_sort(raw: Option<&str>) -> Result<SortDirection, ServiceError> {
    match raw {
        None => Ok(SortDirection::default()),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ServiceError::ValidationError(format!(
                "sort must be \"asc\" or \"desc\", got \"{}\"",
                other
            ))),
        },
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, ServiceError> {
    OrderStatus::from_str(raw)
        .map_err(|_| ServiceError::InvalidStatus(format!("Unknown order status: {}", raw)))
}

fn parse_step(raw: &str) -> Result<ProcessingStep, ServiceError> {
    ProcessingStep::from_str(raw)
        .map_err(|_| ServiceError::InvalidStatus(format!("Unknown processing step: {}", raw)))
}

/// List orders, optionally for one shop
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders with current status, latest processing step and rejection detail", body = ApiResponse<Vec<OrderSummary>>),
        (status = 400, description = "Invalid query parameters", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ApiResponse<Vec<OrderSummary>>>, ServiceError> {
    let sort = parse_sort(query.sort.as_deref())?;
    let orders = state
        .services
        .orders
        .list_orders(query.shop_id, sort)
        .await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// Get the denormalized detail view of one order
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order detail",
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderDetail>>, ServiceError> {
    let detail = state.services.orders.get_order_detail(id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// Append a status transition to the order's history
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    params(("id" = Uuid, Path, description = "Order identifier")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status row appended", body = ApiResponse<StatusRecord>),
        (status = 400, description = "Unknown status or illegal transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<StatusRecord>>, ServiceError> {
    request.validate()?;
    let target = parse_status(&request.status)?;
    let record = state
        .services
        .lifecycle
        .record_status(id, target, request.reason, request.note)
        .await?;
    Ok(Json(ApiResponse::success(record)))
}

/// Append a processing sub-status to the order's trail
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/processing",
    summary = "Record processing step",
    params(("id" = Uuid, Path, description = "Order identifier")),
    request_body = RecordProcessingStepRequest,
    responses(
        (status = 200, description = "Processing row appended (plus a status row for \"Out for Delivery\")", body = ApiResponse<ProcessingRecord>),
        (status = 400, description = "Unknown step or out-of-sequence step", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn record_processing_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordProcessingStepRequest>,
) -> Result<Json<ApiResponse<ProcessingRecord>>, ServiceError> {
    request.validate()?;
    let step = parse_step(&request.step)?;
    let record = state
        .services
        .lifecycle
        .record_processing_step(id, step)
        .await?;
    Ok(Json(ApiResponse::success(record)))
}

/// Overwrite the order's recorded laundry weight
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/weight",
    summary = "Amend order weight",
    params(("id" = Uuid, Path, description = "Order identifier")),
    request_body = AmendWeightRequest,
    responses(
        (status = 200, description = "Weight overwritten", body = ApiResponse<WeightAmendment>),
        (status = 400, description = "Invalid weight", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order or laundry detail not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn amend_weight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AmendWeightRequest>,
) -> Result<Json<ApiResponse<WeightAmendment>>, ServiceError> {
    let amendment = state
        .services
        .orders
        .amend_weight(id, request.weight_kg)
        .await?;
    Ok(Json(ApiResponse::success(amendment)))
}
