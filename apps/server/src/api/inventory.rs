//! # Inventory Handlers
//!
//! Stock CRUD. Every response goes through the visibility projection:
//! owners never receive cost prices, and each row carries the derived
//! `lowStock` flag for the dashboard.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use atlas_core::validation::{
    validate_low_stock_threshold, validate_name, validate_price_cents, validate_stock_level,
};
use atlas_core::{InventoryItemUpdate, InventoryItemView, NewInventoryItem};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::services::ensure_shop_access;
use crate::state::AppState;

fn validate_new_item(item: &NewInventoryItem) -> ApiResult<()> {
    validate_name("brand", &item.brand)?;
    validate_name("model", &item.model)?;
    validate_name("storage", &item.storage)?;
    validate_name("ram", &item.ram)?;
    validate_stock_level(item.quantity)?;
    validate_price_cents("costPriceCents", item.cost_price_cents)?;
    validate_price_cents("sellingPriceCents", item.selling_price_cents)?;
    if let Some(threshold) = item.low_stock_threshold {
        validate_low_stock_threshold(threshold)?;
    }
    Ok(())
}

fn validate_item_update(changes: &InventoryItemUpdate) -> ApiResult<()> {
    if let Some(brand) = &changes.brand {
        validate_name("brand", brand)?;
    }
    if let Some(model) = &changes.model {
        validate_name("model", model)?;
    }
    if let Some(quantity) = changes.quantity {
        validate_stock_level(quantity)?;
    }
    if let Some(cost) = changes.cost_price_cents {
        validate_price_cents("costPriceCents", cost)?;
    }
    if let Some(selling) = changes.selling_price_cents {
        validate_price_cents("sellingPriceCents", selling)?;
    }
    if let Some(threshold) = changes.low_stock_threshold {
        validate_low_stock_threshold(threshold)?;
    }
    Ok(())
}

/// GET /api/shops/{shop_id}/inventory
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(shop_id): Path<String>,
) -> ApiResult<Json<Vec<InventoryItemView>>> {
    ensure_shop_access(&state.db, &current, &shop_id).await?;

    let items = state.db.inventory().list_by_shop(&shop_id).await?;
    let views = items
        .into_iter()
        .map(|item| InventoryItemView::project(item, current.role))
        .collect();

    Ok(Json(views))
}

/// POST /api/shops/{shop_id}/inventory
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(shop_id): Path<String>,
    Json(request): Json<NewInventoryItem>,
) -> ApiResult<(StatusCode, Json<InventoryItemView>)> {
    ensure_shop_access(&state.db, &current, &shop_id).await?;
    validate_new_item(&request)?;

    let item = state.db.inventory().insert(&shop_id, &request).await?;

    info!(item_id = %item.id, shop_id = %shop_id, brand = %item.brand, model = %item.model, by = %current.username, "Inventory item added");

    Ok((
        StatusCode::CREATED,
        Json(InventoryItemView::project(item, current.role)),
    ))
}

/// PUT /api/inventory/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(changes): Json<InventoryItemUpdate>,
) -> ApiResult<Json<InventoryItemView>> {
    let existing = state
        .db
        .inventory()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("InventoryItem", &id))?;
    ensure_shop_access(&state.db, &current, &existing.shop_id).await?;

    validate_item_update(&changes)?;

    let item = state.db.inventory().update(&id, &changes).await?;

    info!(item_id = %id, by = %current.username, "Inventory item updated");

    Ok(Json(InventoryItemView::project(item, current.role)))
}

/// DELETE /api/inventory/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let existing = state
        .db
        .inventory()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("InventoryItem", &id))?;
    ensure_shop_access(&state.db, &current, &existing.shop_id).await?;

    state.db.inventory().delete(&id).await?;

    info!(item_id = %id, by = %current.username, "Inventory item deleted");

    Ok(StatusCode::NO_CONTENT)
}
