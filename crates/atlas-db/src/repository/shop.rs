//! # Shop Repository
//!
//! Database operations for shops (tenants). Deleting a shop cascades to
//! its customers, inventory and sales via the schema's foreign keys.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atlas_core::{NewShop, Shop, ShopUpdate};

const SELECT_SHOP: &str =
    "SELECT id, name, location, address, phone, owner_id, created_at FROM shops";

/// Repository for shop database operations.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Registers a shop for the given owner.
    pub async fn insert(&self, owner_id: &str, new: &NewShop) -> DbResult<Shop> {
        let shop = Shop {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            location: new.location.clone(),
            address: new.address.clone(),
            phone: new.phone.clone(),
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
        };

        debug!(id = %shop.id, name = %shop.name, owner = %owner_id, "Inserting shop");

        sqlx::query(
            r#"
            INSERT INTO shops (id, name, location, address, phone, owner_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&shop.id)
        .bind(&shop.name)
        .bind(&shop.location)
        .bind(&shop.address)
        .bind(&shop.phone)
        .bind(&shop.owner_id)
        .bind(shop.created_at)
        .execute(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Gets a shop by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(&format!("{SELECT_SHOP} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(shop)
    }

    /// Lists every shop (superuser view), newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Shop>> {
        let shops =
            sqlx::query_as::<_, Shop>(&format!("{SELECT_SHOP} ORDER BY created_at DESC"))
                .fetch_all(&self.pool)
                .await?;

        Ok(shops)
    }

    /// Lists the shops owned by one user, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Shop>> {
        let shops = sqlx::query_as::<_, Shop>(&format!(
            "{SELECT_SHOP} WHERE owner_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shops)
    }

    /// Applies a partial update; `None` fields are left unchanged.
    pub async fn update(&self, id: &str, changes: &ShopUpdate) -> DbResult<Shop> {
        let mut shop = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Shop", id))?;

        if let Some(name) = &changes.name {
            shop.name = name.clone();
        }
        if let Some(location) = &changes.location {
            shop.location = location.clone();
        }
        if let Some(address) = &changes.address {
            shop.address = address.clone();
        }
        if let Some(phone) = &changes.phone {
            shop.phone = phone.clone();
        }

        sqlx::query(
            r#"
            UPDATE shops SET name = ?2, location = ?3, address = ?4, phone = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&shop.id)
        .bind(&shop.name)
        .bind(&shop.location)
        .bind(&shop.address)
        .bind(&shop.phone)
        .execute(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Deletes a shop and, through cascading foreign keys, everything it
    /// owns.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM shops WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
