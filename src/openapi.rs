use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Washline API",
        description = r#"
# Washline Order Management API

Backend for the Washline laundry-shop app: order listing and detail,
append-only status history, the processing trail, weight amendments,
shop dashboards and staff login.

## Error Handling

Errors use consistent JSON payloads with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "Order 550e8400-e29b-41d4-a716-446655440000 not found",
  "timestamp": "2025-03-01T00:00:00Z"
}
```
        "#,
        contact(name = "Washline", email = "dev@washline.app"),
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Orders", description = "Order listing, detail and lifecycle endpoints"),
        (name = "Reports", description = "Shop dashboard aggregation"),
        (name = "Users", description = "Staff login")
    ),
    paths(
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::record_processing_step,
        crate::handlers::orders::amend_weight,
        crate::handlers::reports::shop_summary,
        crate::handlers::users::login,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::errors::ErrorResponse,
            crate::handlers::orders::UpdateOrderStatusRequest,
            crate::handlers::orders::RecordProcessingStepRequest,
            crate::handlers::orders::AmendWeightRequest,
            crate::handlers::users::LoginRequest,
            crate::services::orders::OrderSummary,
            crate::services::orders::OrderDetail,
            crate::services::orders::AddressView,
            crate::services::orders::RejectionDetail,
            crate::services::orders::WeightAmendment,
            crate::services::order_status::StatusRecord,
            crate::services::order_status::ProcessingRecord,
            crate::services::reports::ShopSummaryReport,
            crate::services::reports::WeekdayRevenue,
            crate::services::reports::RecentOrder,
            crate::services::users::StaffProfile,
        )
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, backed by the generated OpenAPI document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
