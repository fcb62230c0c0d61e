//! # Shop Handlers
//!
//! Shop CRUD. Owners see and touch only their own shops; superusers see
//! everything. The owner of a new shop is always the caller - the
//! client cannot register shops for someone else.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use atlas_core::validation::{validate_mobile, validate_name};
use atlas_core::{NewShop, Shop, ShopUpdate};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::ensure_shop_access;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShopRequest {
    pub name: String,
    pub location: String,
    pub address: String,
    pub phone: String,
}

fn validate_shop_fields(name: &str, location: &str, address: &str, phone: &str) -> ApiResult<()> {
    validate_name("name", name)?;
    validate_name("location", location)?;
    validate_name("address", address)?;
    validate_mobile(phone)?;
    Ok(())
}

/// GET /api/shops
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Shop>>> {
    let shops = if current.role.is_superuser() {
        state.db.shops().list_all().await?
    } else {
        state.db.shops().list_by_owner(&current.id).await?
    };

    Ok(Json(shops))
}

/// POST /api/shops
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateShopRequest>,
) -> ApiResult<(StatusCode, Json<Shop>)> {
    validate_shop_fields(&request.name, &request.location, &request.address, &request.phone)?;

    let shop = state
        .db
        .shops()
        .insert(
            &current.id,
            &NewShop {
                name: request.name,
                location: request.location,
                address: request.address,
                phone: request.phone,
            },
        )
        .await?;

    info!(shop_id = %shop.id, name = %shop.name, owner = %current.username, "Shop registered");

    Ok((StatusCode::CREATED, Json(shop)))
}

/// GET /api/shops/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Shop>> {
    let shop = ensure_shop_access(&state.db, &current, &id).await?;
    Ok(Json(shop))
}

/// PUT /api/shops/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(changes): Json<ShopUpdate>,
) -> ApiResult<Json<Shop>> {
    ensure_shop_access(&state.db, &current, &id).await?;

    if let Some(name) = &changes.name {
        validate_name("name", name)?;
    }
    if let Some(phone) = &changes.phone {
        validate_mobile(phone)?;
    }

    let shop = state.db.shops().update(&id, &changes).await?;

    info!(shop_id = %id, by = %current.username, "Shop updated");

    Ok(Json(shop))
}

/// DELETE /api/shops/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    ensure_shop_access(&state.db, &current, &id).await?;

    state.db.shops().delete(&id).await?;

    info!(shop_id = %id, by = %current.username, "Shop deleted");

    Ok(StatusCode::NO_CONTENT)
}
