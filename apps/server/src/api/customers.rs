//! # Customer Handlers
//!
//! Customer listing, type-ahead search and registration, shop-scoped.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use atlas_core::validation::{validate_mobile, validate_name};
use atlas_core::{Customer, NewCustomer};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::ensure_shop_access;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CustomerListQuery {
    /// When present, runs the capped name/mobile search instead of the
    /// full listing.
    pub search: Option<String>,
}

/// GET /api/shops/{shop_id}/customers
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(shop_id): Path<String>,
    Query(query): Query<CustomerListQuery>,
) -> ApiResult<Json<Vec<Customer>>> {
    ensure_shop_access(&state.db, &current, &shop_id).await?;

    let customers = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => state.db.customers().search(&shop_id, term).await?,
        _ => state.db.customers().list_by_shop(&shop_id).await?,
    };

    Ok(Json(customers))
}

/// POST /api/shops/{shop_id}/customers
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(shop_id): Path<String>,
    Json(request): Json<NewCustomer>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    ensure_shop_access(&state.db, &current, &shop_id).await?;

    validate_name("name", &request.name)?;
    validate_mobile(&request.mobile)?;

    let customer = state.db.customers().insert(&shop_id, &request).await?;

    info!(customer_id = %customer.id, shop_id = %shop_id, by = %current.username, "Customer registered");

    Ok((StatusCode::CREATED, Json(customer)))
}
