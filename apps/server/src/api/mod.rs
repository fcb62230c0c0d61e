//! # API Handlers
//!
//! One module per resource, wired into a single [`axum::Router`].
//!
//! ## Route Map
//! ```text
//! POST   /api/auth/login                     login, returns token + user
//! GET    /api/auth/me                        current principal
//!
//! POST   /api/admin/users                    create user        (superuser)
//! GET    /api/admin/users                    list users         (superuser)
//! PUT    /api/admin/users/{id}               update user        (superuser)
//! DELETE /api/admin/users/{id}               delete user        (superuser)
//!
//! GET    /api/shops                          own shops / all for superuser
//! POST   /api/shops                          register shop (owner = caller)
//! GET    /api/shops/{shop_id}                shop detail
//! PUT    /api/shops/{shop_id}                update shop
//! DELETE /api/shops/{shop_id}                delete shop
//!
//! GET    /api/shops/{shop_id}/inventory      list (role-projected)
//! POST   /api/shops/{shop_id}/inventory      add item
//! PUT    /api/inventory/{id}                 update item
//! DELETE /api/inventory/{id}                 delete item
//!
//! GET    /api/shops/{shop_id}/customers      list / ?search=
//! POST   /api/shops/{shop_id}/customers      register customer
//!
//! POST   /api/shops/{shop_id}/sales          checkout
//! GET    /api/shops/{shop_id}/sales          ledger, ?startDate=&endDate=
//! GET    /api/shops/{shop_id}/sales/summary  dashboard aggregates
//!
//! GET    /api/health                         liveness + db ping
//! ```

pub mod admin;
pub mod auth;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod sales;
pub mod shops;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/admin/users", post(admin::create_user).get(admin::list_users))
        .route(
            "/api/admin/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/api/shops", get(shops::list).post(shops::create))
        .route(
            "/api/shops/{shop_id}",
            get(shops::get_by_id).put(shops::update).delete(shops::delete),
        )
        .route(
            "/api/shops/{shop_id}/inventory",
            get(inventory::list).post(inventory::create),
        )
        .route(
            "/api/inventory/{id}",
            put(inventory::update).delete(inventory::delete),
        )
        .route(
            "/api/shops/{shop_id}/customers",
            get(customers::list).post(customers::create),
        )
        .route(
            "/api/shops/{shop_id}/sales",
            get(sales::list).post(sales::create),
        )
        .route("/api/shops/{shop_id}/sales/summary", get(sales::summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
