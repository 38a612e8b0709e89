mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn json_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Decimal fields serialize as JSON strings; read them numerically.
fn decimal_field(value: &Value) -> f64 {
    value
        .as_str()
        .map(|s| s.parse().expect("numeric string"))
        .or_else(|| value.as_f64())
        .expect("decimal field")
}

#[tokio::test]
async fn register_login_and_shop_over_http() {
    let app = TestApp::new().await;
    let router = app.router();

    let seller = app.seed_seller("Http Shop").await;
    let product = app.seed_product(&seller, "Wired Kettle", dec!(100), 10, 5).await;

    // Register a customer.
    let (status, body) = json_request(
        &router,
        "POST",
        "/api/v1/customers/register",
        None,
        Some(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@http.test",
            "password": "correct-horse-battery",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["token"]["access_token"].as_str().unwrap().to_string();

    // Protected routes refuse missing credentials.
    let (status, _) = json_request(&router, "GET", "/api/v1/customers/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Add the product to the cart and read the checkout summary.
    let (status, _) = json_request(
        &router,
        "POST",
        "/api/v1/customers/cart",
        Some(&token),
        Some(json!({ "product_id": product.id, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, summary) =
        json_request(&router, "GET", "/api/v1/customers/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&summary["total_price"]), 180.0);
    assert_eq!(decimal_field(&summary["shipping_fee"]), 20.0);

    // Place the order and confirm payment through the public surface.
    let (status, placed) = json_request(
        &router,
        "POST",
        "/api/v1/orders",
        Some(&token),
        Some(json!({
            "shipping_address": {
                "name": "Ada Lovelace",
                "address": "1 Analytical Way",
                "phone": "555-0100",
                "post": "12345",
                "province": "State",
                "city": "Town",
                "area": "Center",
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let confirm_uri = format!("/api/v1/payments/orders/{order_id}/confirm");
    let (status, outcome) = json_request(&router, "PATCH", &confirm_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], json!("confirmed"));

    // A replay reports the idempotent path.
    let (status, outcome) = json_request(&router, "PATCH", &confirm_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], json!("already_paid"));
}

#[tokio::test]
async fn role_gates_are_enforced() {
    let app = TestApp::new().await;
    let router = app.router();

    // A customer token cannot reach admin surfaces.
    let (_, registered) = json_request(
        &router,
        "POST",
        "/api/v1/customers/register",
        None,
        Some(json!({
            "first_name": "Eve",
            "last_name": "Intruder",
            "email": "eve@http.test",
            "password": "not-an-admin-pw",
        })),
    )
    .await;
    let token = registered["token"]["access_token"].as_str().unwrap();

    let (status, _) = json_request(
        &router,
        "GET",
        "/api/v1/admin/dashboard",
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Public catalog stays open.
    let (status, _) = json_request(&router, "GET", "/api/v1/products/home", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
