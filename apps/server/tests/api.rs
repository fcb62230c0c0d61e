//! End-to-end tests driving the router in-process.
//!
//! Each test builds a fresh in-memory database, seeds accounts through
//! the repositories, then talks to the API exactly like the web client
//! does: JSON over HTTP, bearer tokens, camelCase fields.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use atlas_core::{NewUser, Role};
use atlas_db::{Database, DbConfig};
use atlas_server::auth::password::hash_password;
use atlas_server::auth::JwtService;
use atlas_server::{api, AppState};

// =============================================================================
// Harness
// =============================================================================

async fn test_app() -> (Router, AppState) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::new(db, JwtService::new("test-secret", 12));
    (api::router(state.clone()), state)
}

async fn seed_user(state: &AppState, username: &str, password: &str, role: Role) {
    state
        .db
        .users()
        .insert(&NewUser {
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            role,
            name: None,
        })
        .await
        .unwrap();
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Seeds an owner with one shop and returns (owner token, shop id).
async fn owner_with_shop(app: &Router, state: &AppState) -> (String, String) {
    seed_user(state, "owner", "owner-pass", Role::Owner).await;
    let token = login(app, "owner", "owner-pass").await;

    let (status, shop) = send(
        app,
        Method::POST,
        "/api/shops",
        Some(&token),
        Some(json!({
            "name": "Galaxy Mobiles",
            "location": "Lahore",
            "address": "Shop 14, Hall Road",
            "phone": "042-3711-0000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (token, shop["id"].as_str().unwrap().to_string())
}

async fn add_item(app: &Router, token: &str, shop_id: &str, quantity: i64) -> String {
    let (status, item) = send(
        app,
        Method::POST,
        &format!("/api/shops/{shop_id}/inventory"),
        Some(token),
        Some(json!({
            "brand": "Apple",
            "model": "iPhone 13",
            "storage": "128GB",
            "ram": "4GB",
            "quantity": quantity,
            "costPriceCents": 70_00,
            "sellingPriceCents": 100_00
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "add item failed: {item}");
    item["id"].as_str().unwrap().to_string()
}

async fn add_customer(app: &Router, token: &str, shop_id: &str) -> String {
    let (status, customer) = send(
        app,
        Method::POST,
        &format!("/api/shops/{shop_id}/customers"),
        Some(token),
        Some(json!({ "name": "Hamza Khan", "mobile": "0300-1234567" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    customer["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn login_rejects_bad_credentials_and_me_reflects_the_principal() {
    let (app, state) = test_app().await;
    seed_user(&state, "admin", "admin-pass", Role::Superuser).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app, "admin", "admin-pass").await;
    let (status, me) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "admin");
    assert_eq!(me["role"], "superuser");
    assert!(me.get("passwordHash").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _state) = test_app().await;

    let (status, _) = send(&app, Method::GET, "/api/shops", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/shops", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays open.
    let (status, health) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}

// =============================================================================
// Tenancy
// =============================================================================

#[tokio::test]
async fn owners_cannot_reach_each_others_shops() {
    let (app, state) = test_app().await;
    let (_owner_token, shop_id) = owner_with_shop(&app, &state).await;

    seed_user(&state, "rival", "rival-pass", Role::Owner).await;
    let rival_token = login(&app, "rival", "rival-pass").await;

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}"),
        Some(&rival_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The rival's shop list is empty; a superuser sees the shop.
    let (_, shops) = send(&app, Method::GET, "/api/shops", Some(&rival_token), None).await;
    assert_eq!(shops.as_array().unwrap().len(), 0);

    seed_user(&state, "admin", "admin-pass", Role::Superuser).await;
    let admin_token = login(&app, "admin", "admin-pass").await;
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_are_superuser_only() {
    let (app, state) = test_app().await;
    seed_user(&state, "owner", "owner-pass", Role::Owner).await;
    let owner_token = login(&app, "owner", "owner-pass").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/admin/users",
        Some(&owner_token),
        Some(json!({ "username": "sneaky", "password": "secret-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    seed_user(&state, "admin", "admin-pass", Role::Superuser).await;
    let admin_token = login(&app, "admin", "admin-pass").await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/admin/users",
        Some(&admin_token),
        Some(json!({ "username": "cashier", "password": "secret-1", "role": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "owner");

    // Duplicate usernames are rejected as a conflict.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/admin/users",
        Some(&admin_token),
        Some(json!({ "username": "cashier", "password": "secret-2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Checkout + ledger
// =============================================================================

#[tokio::test]
async fn checkout_computes_totals_decrements_stock_and_redacts_by_role() {
    let (app, state) = test_app().await;
    let (owner_token, shop_id) = owner_with_shop(&app, &state).await;
    let item_id = add_item(&app, &owner_token, &shop_id, 10).await;
    let customer_id = add_customer(&app, &owner_token, &shop_id).await;

    // The worked example: 3 units at 100.00 selling / 70.00 cost.
    let (status, sale) = send(
        &app,
        Method::POST,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        Some(json!({
            "customerId": customer_id,
            "items": [{ "inventoryId": item_id, "quantity": 3 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "checkout failed: {sale}");
    assert_eq!(sale["totalAmountCents"], 300_00);
    assert!(sale["invoiceCode"].as_str().unwrap().starts_with("INV-"));
    // The owner never sees profit or cost, even on their own sale.
    assert!(sale.get("totalProfitCents").is_none());
    assert!(sale["items"][0].get("costPriceCents").is_none());
    assert_eq!(sale["items"][0]["unitPriceCents"], 100_00);
    assert_eq!(sale["customer"]["name"], "Hamza Khan");

    // Stock dropped to 7, and the owner's inventory view hides cost too.
    let (_, inventory) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/inventory"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(inventory[0]["quantity"], 7);
    assert!(inventory[0].get("costPriceCents").is_none());

    // Superuser sees the full ledger: profit and cost snapshots.
    seed_user(&state, "admin", "admin-pass", Role::Superuser).await;
    let admin_token = login(&app, "admin", "admin-pass").await;

    let (status, sales) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales.as_array().unwrap().len(), 1);
    assert_eq!(sales[0]["totalProfitCents"], 90_00);
    assert_eq!(sales[0]["items"][0]["costPriceCents"], 70_00);

    let (_, admin_inventory) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/inventory"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(admin_inventory[0]["costPriceCents"], 70_00);

    // Summary follows the same projection rules.
    let (_, owner_summary) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/sales/summary"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(owner_summary["saleCount"], 1);
    assert_eq!(owner_summary["unitsSold"], 3);
    assert_eq!(owner_summary["totalAmountCents"], 300_00);
    assert!(owner_summary.get("totalProfitCents").is_none());

    let (_, admin_summary) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/sales/summary"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(admin_summary["totalProfitCents"], 90_00);
}

#[tokio::test]
async fn oversell_returns_422_and_mutates_nothing() {
    let (app, state) = test_app().await;
    let (owner_token, shop_id) = owner_with_shop(&app, &state).await;
    let item_id = add_item(&app, &owner_token, &shop_id, 10).await;
    let customer_id = add_customer(&app, &owner_token, &shop_id).await;

    let (status, error) = send(
        &app,
        Method::POST,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        Some(json!({
            "customerId": customer_id,
            "items": [{ "inventoryId": item_id, "quantity": 11 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "INSUFFICIENT_STOCK");
    assert!(error["message"].as_str().unwrap().contains("available 10"));

    let (_, inventory) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/inventory"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(inventory[0]["quantity"], 10);

    let (_, sales) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(sales.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn checkout_rejects_unknown_references_and_empty_carts() {
    let (app, state) = test_app().await;
    let (owner_token, shop_id) = owner_with_shop(&app, &state).await;
    let item_id = add_item(&app, &owner_token, &shop_id, 10).await;
    let customer_id = add_customer(&app, &owner_token, &shop_id).await;

    // Unknown inventory id.
    let (status, error) = send(
        &app,
        Method::POST,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        Some(json!({
            "customerId": customer_id,
            "items": [{ "inventoryId": "ghost", "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error["message"].as_str().unwrap().contains("ghost"));

    // Unknown customer id.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        Some(json!({
            "customerId": "ghost",
            "items": [{ "inventoryId": item_id, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Empty cart.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        Some(json!({ "customerId": customer_id, "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn price_override_flows_into_totals() {
    let (app, state) = test_app().await;
    let (owner_token, shop_id) = owner_with_shop(&app, &state).await;
    let item_id = add_item(&app, &owner_token, &shop_id, 10).await;
    let customer_id = add_customer(&app, &owner_token, &shop_id).await;

    let (status, sale) = send(
        &app,
        Method::POST,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        Some(json!({
            "customerId": customer_id,
            "items": [{ "inventoryId": item_id, "quantity": 2, "unitPriceCents": 95_00 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["totalAmountCents"], 190_00);
    assert_eq!(sale["items"][0]["unitPriceCents"], 95_00);
}

#[tokio::test]
async fn date_filter_bounds_the_ledger() {
    let (app, state) = test_app().await;
    let (owner_token, shop_id) = owner_with_shop(&app, &state).await;
    let item_id = add_item(&app, &owner_token, &shop_id, 10).await;
    let customer_id = add_customer(&app, &owner_token, &shop_id).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/shops/{shop_id}/sales"),
        Some(&owner_token),
        Some(json!({
            "customerId": customer_id,
            "items": [{ "inventoryId": item_id, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A window far in the past excludes today's sale.
    let (_, past) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/sales?startDate=2000-01-01&endDate=2000-01-31"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(past.as_array().unwrap().len(), 0);

    // An open-ended range includes it.
    let (_, open) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/sales?startDate=2000-01-01"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(open.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn customer_search_backs_the_type_ahead() {
    let (app, state) = test_app().await;
    let (owner_token, shop_id) = owner_with_shop(&app, &state).await;
    add_customer(&app, &owner_token, &shop_id).await;

    let (_, hits) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/customers?search=hamza"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "Hamza Khan");

    let (_, misses) = send(
        &app,
        Method::GET,
        &format!("/api/shops/{shop_id}/customers?search=nobody"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(misses.as_array().unwrap().len(), 0);
}
