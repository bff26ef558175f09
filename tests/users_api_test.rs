mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{read_json, TestApp};

#[tokio::test]
async fn login_returns_role_and_shop_affiliation() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    app.seed_staff_user("mara@washline.app", "sudsy-pass", shop_id)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/users/login",
            Some(json!({ "email": "mara@washline.app", "password": "sudsy-pass" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "mara@washline.app");
    assert_eq!(body["data"]["role"], "staff");
    assert_eq!(body["data"]["shop_id"], shop_id.to_string());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    let shop_id = app.seed_shop("Suds Central").await;
    app.seed_staff_user("mara@washline.app", "sudsy-pass", shop_id)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/users/login",
            Some(json!({ "email": "mara@washline.app", "password": "wrong" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = read_json(response).await;
    assert_eq!(body["message"], "Authentication error: Invalid email or password");
}

#[tokio::test]
async fn login_with_missing_fields_is_a_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/users/login",
            Some(json!({ "email": "mara@washline.app", "password": "" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
