//! Storefront and admin APIs over HTTP.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`chow-cli migrate`)
//! - At least one available product (`chow-cli seed menu`)
//! - Both services running
//! - For the admin tests, an admin account in `CHOWLINE_TEST_ADMIN_EMAIL` /
//!   `CHOWLINE_TEST_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p chowline-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use chowline_integration_tests::{
    admin_base_url, admin_credentials, session_client, storefront_base_url, unique_email,
};

/// Decimal strings and numbers both become `f64` for comparison.
fn amount(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        other => other.as_f64().expect("number"),
    }
}

/// Register a fresh customer; the client keeps the session cookie.
async fn signed_in_customer() -> Client {
    let client = session_client();
    let resp = client
        .post(format!("{}/auth/register", storefront_base_url()))
        .json(&json!({
            "email": unique_email(),
            "username": "Integration Diner",
            "password": "integration-pass",
            "phone": "+2348000000000",
            "address": "12 Allen Avenue, Ikeja",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);
    client
}

async fn first_available_product(client: &Client) -> Value {
    let menu: Vec<Value> = client
        .get(format!("{}/api/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list menu")
        .json()
        .await
        .expect("Menu is not JSON");
    menu.into_iter()
        .find(|p| p["available"] == json!(true))
        .expect("No available products; seed the menu first")
}

// ============================================================================
// Storefront
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_health_and_readiness() {
    let client = session_client();
    for path in ["/health", "/health/ready"] {
        let resp = client
            .get(format!("{}{path}", storefront_base_url()))
            .send()
            .await
            .expect("Storefront unreachable");
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_checkout_places_order_and_clears_cart() {
    let client = signed_in_customer().await;
    let base = storefront_base_url();
    let product = first_available_product(&client).await;

    let cart: Value = client
        .post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": product["id"], "quantity": 2 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], json!(2));
    let expected_total = amount(&product["price"]) * 2.0;
    assert!((amount(&cart["total"]) - expected_total).abs() < 0.001);

    // Customer details fall back to the profile
    let resp = client.post(format!("{base}/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let placed: Value = resp.json().await.unwrap();
    assert_eq!(placed["status"], json!("pending"));
    assert_eq!(placed["customer_address"], json!("12 Allen Avenue, Ikeja"));
    assert!((amount(&placed["total"]) - expected_total).abs() < 0.001);
    assert_eq!(placed["items"].as_array().unwrap().len(), 1);

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], json!(0));

    let orders: Vec<Value> = client
        .get(format!("{base}/api/orders/user"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], placed["id"]);

    let resp = client
        .get(format!("{base}/api/orders/{}/items", placed["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_empty_cart_checkout_is_rejected() {
    let client = signed_in_customer().await;
    let resp = client
        .post(format!("{}/checkout", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_other_customers_orders_are_hidden() {
    let owner = signed_in_customer().await;
    let base = storefront_base_url();
    let product = first_available_product(&owner).await;

    let placed: Value = owner
        .post(format!("{base}/api/orders"))
        .json(&json!({ "items": [{ "product_id": product["id"], "quantity": 1 }] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let stranger = signed_in_customer().await;
    let resp = stranger
        .get(format!("{base}/api/orders/{}/items", placed["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_duplicate_registration_conflicts() {
    let client = session_client();
    let email = unique_email();
    let body = json!({ "email": email, "username": "Twice", "password": "integration-pass" });

    let first = client
        .post(format!("{}/auth/register", storefront_base_url()))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = session_client()
        .post(format!("{}/auth/register", storefront_base_url()))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

// ============================================================================
// Admin
// ============================================================================

async fn signed_in_admin() -> Option<Client> {
    let (email, password) = admin_credentials()?;
    let client = session_client();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Admin unreachable");
    assert_eq!(resp.status(), StatusCode::OK);
    Some(client)
}

#[tokio::test]
#[ignore = "Requires running storefront, admin and database"]
async fn test_customer_cannot_sign_in_to_admin() {
    let email = unique_email();
    session_client()
        .post(format!("{}/auth/register", storefront_base_url()))
        .json(&json!({ "email": email, "username": "Diner", "password": "integration-pass" }))
        .send()
        .await
        .unwrap();

    let resp = session_client()
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": email, "password": "integration-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running storefront, admin, database and admin credentials"]
async fn test_completing_an_order_shows_up_in_revenue() {
    let Some(admin) = signed_in_admin().await else {
        return;
    };
    let admin_base = admin_base_url();

    let before: Value = admin
        .get(format!("{admin_base}/api/reports/revenue?period=day&buckets=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let customer = signed_in_customer().await;
    let product = first_available_product(&customer).await;
    let placed: Value = customer
        .post(format!("{}/api/orders", storefront_base_url()))
        .json(&json!({ "items": [{ "product_id": product["id"], "quantity": 3 }] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let resp = admin
        .put(format!("{admin_base}/api/orders/{}", placed["id"]))
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Completed orders cannot go back to pending
    let resp = admin
        .put(format!("{admin_base}/api/orders/{}", placed["id"]))
        .json(&json!({ "status": "pending" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let after: Value = admin
        .get(format!("{admin_base}/api/reports/revenue?period=day&buckets=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let gained = amount(&after["total"]) - amount(&before["total"]);
    assert!((gained - amount(&placed["total"])).abs() < 0.001);
    assert_eq!(after["buckets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "Requires running admin, database and admin credentials"]
async fn test_dashboard_stats_shape() {
    let Some(admin) = signed_in_admin().await else {
        return;
    };
    let stats: Value = admin
        .get(format!("{}/api/dashboard/stats", admin_base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    for key in ["orders", "total_orders", "revenue", "revenue_today", "products", "customers"] {
        assert!(stats.get(key).is_some(), "missing {key}");
    }
    assert!(stats["recent_orders"].as_array().unwrap().len() <= 5);
}
