mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde_json::json;
use uuid::Uuid;
use washline_api::entities::{order_processing, order_status, rejected_order};
use washline_api::errors::ServiceError;
use washline_api::models::OrderStatus;

use common::{read_json, TestApp};

async fn status_rows(app: &TestApp, order_id: Uuid) -> Vec<order_status::Model> {
    order_status::Entity::find()
        .filter(order_status::Column::OrderId.eq(order_id))
        .order_by_asc(order_status::Column::Sequence)
        .all(&*app.state.db)
        .await
        .expect("query status history")
}

async fn update_status(
    app: &TestApp,
    order_id: Uuid,
    body: serde_json::Value,
) -> axum::response::Response {
    app.request(
        Method::PUT,
        &format!("/api/v1/orders/{}/status", order_id),
        Some(body),
    )
    .await
}

async fn record_step(
    app: &TestApp,
    order_id: Uuid,
    step: &str,
) -> axum::response::Response {
    app.request(
        Method::POST,
        &format!("/api/v1/orders/{}/processing", order_id),
        Some(json!({ "step": step })),
    )
    .await
}

#[tokio::test]
async fn accepting_a_pending_order_appends_a_status_row() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    let response = update_status(&app, seeded.order_id, json!({ "status": "Processing" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "Processing");
    assert_eq!(body["data"]["sequence"], 2);

    let rows = status_rows(&app, seeded.order_id).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].status, "Processing");
}

#[tokio::test]
async fn illegal_transition_is_rejected_before_any_write() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    let response = update_status(&app, seeded.order_id, json!({ "status": "Completed" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let rows = status_rows(&app, seeded.order_id).await;
    assert_eq!(rows.len(), 1, "no row may land for a rejected transition");
}

#[tokio::test]
async fn repeating_a_transition_appends_two_history_rows() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    let first = update_status(&app, seeded.order_id, json!({ "status": "Processing" })).await;
    assert_eq!(first.status(), StatusCode::OK);
    let second = update_status(&app, seeded.order_id, json!({ "status": "Processing" })).await;
    assert_eq!(second.status(), StatusCode::OK);

    // The log is append-only; repeated calls are never deduplicated.
    let rows = status_rows(&app, seeded.order_id).await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].status, "Processing");
    assert_eq!(rows[2].sequence, 3);
}

#[tokio::test]
async fn rejecting_with_a_reason_creates_exactly_one_rejection_record() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    let response = update_status(
        &app,
        seeded.order_id,
        json!({ "status": "Rejected", "reason": "Unsupported fabric", "note": "silk blend" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["rejection_recorded"], true);

    let rejections = rejected_order::Entity::find()
        .filter(rejected_order::Column::OrderId.eq(seeded.order_id))
        .all(&*app.state.db)
        .await
        .expect("query rejections");
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].reason, "Unsupported fabric");
    assert_eq!(rejections[0].note.as_deref(), Some("silk blend"));

    // The listing surfaces the rejection detail.
    let response = app.request(Method::GET, "/api/v1/orders", None).await;
    let body = read_json(response).await;
    assert_eq!(
        body["data"][0]["rejection"]["reason"],
        "Unsupported fabric"
    );
}

#[tokio::test]
async fn rejecting_without_a_reason_appends_status_but_no_rejection_record() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    let response = update_status(&app, seeded.order_id, json!({ "status": "Rejected" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = status_rows(&app, seeded.order_id).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].status, "Rejected");

    let rejection_count = rejected_order::Entity::find()
        .filter(rejected_order::Column::OrderId.eq(seeded.order_id))
        .count(&*app.state.db)
        .await
        .expect("count rejections");
    assert_eq!(rejection_count, 0);
}

#[tokio::test]
async fn service_reports_illegal_jump_as_invalid_status() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    let err = app
        .state
        .services
        .lifecycle
        .record_status(seeded.order_id, OrderStatus::Completed, None, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidStatus(_));
}

#[tokio::test]
async fn unknown_status_label_is_rejected() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    let response = update_status(&app, seeded.order_id, json!({ "status": "Shipped" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_update_on_unknown_order_is_not_found() {
    let app = TestApp::new().await;

    let response = update_status(&app, Uuid::new_v4(), json!({ "status": "Processing" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn processing_steps_enforce_the_wash_press_fold_sequence() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    update_status(&app, seeded.order_id, json!({ "status": "Processing" })).await;

    // Folding before washing is out of sequence.
    let response = record_step(&app, seeded.order_id, "Folded").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for step in ["Washed", "Steam Pressed/Ironed", "Folded"] {
        let response = record_step(&app, seeded.order_id, step).await;
        assert_eq!(response.status(), StatusCode::OK, "step {} should land", step);
    }

    let steps: Vec<String> = order_processing::Entity::find()
        .filter(order_processing::Column::OrderId.eq(seeded.order_id))
        .order_by_asc(order_processing::Column::Sequence)
        .all(&*app.state.db)
        .await
        .expect("query processing trail")
        .into_iter()
        .map(|row| row.step)
        .collect();
    assert_eq!(steps, vec!["Washed", "Steam Pressed/Ironed", "Folded"]);
}

#[tokio::test]
async fn out_for_delivery_appends_exactly_one_for_delivery_status_row() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    update_status(&app, seeded.order_id, json!({ "status": "Processing" })).await;
    for step in ["Washed", "Steam Pressed/Ironed", "Folded"] {
        record_step(&app, seeded.order_id, step).await;
    }

    let status_before = status_rows(&app, seeded.order_id).await.len();

    let response = record_step(&app, seeded.order_id, "Out for Delivery").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["step"], "Out for Delivery");
    assert_eq!(body["data"]["status_record"]["status"], "For Delivery");

    let rows = status_rows(&app, seeded.order_id).await;
    assert_eq!(rows.len(), status_before + 1);
    assert_eq!(rows.last().unwrap().status, "For Delivery");
}

#[tokio::test]
async fn processing_steps_require_a_processing_order() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    let customer_id = app.seed_customer("Mara Santos").await;
    let seeded = app.seed_order(shop_id, customer_id, Utc::now()).await;

    // Order is still Pending.
    let response = record_step(&app, seeded.order_id, "Washed").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let trail_count = order_processing::Entity::find()
        .filter(order_processing::Column::OrderId.eq(seeded.order_id))
        .count(&*app.state.db)
        .await
        .expect("count processing trail");
    assert_eq!(trail_count, 0);
}

#[tokio::test]
async fn processing_step_on_unknown_order_is_not_found() {
    let app = TestApp::new().await;

    let response = record_step(&app, Uuid::new_v4(), "Washed").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
