//! # Inventory Repository
//!
//! Database operations for stocked items.
//!
//! ## Stock Invariant
//! `quantity` never goes negative. Two mechanisms enforce it:
//!
//! 1. [`decrement_stock`] only subtracts when enough stock remains
//!    (`... AND quantity >= ?`), re-reading availability inside the
//!    caller's transaction when the guard fails.
//! 2. The schema carries `CHECK (quantity >= 0)` as a last line of
//!    defense.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │            Guarded Decrement vs. Concurrent Checkout                │
//! │                                                                     │
//! │  stock = 1                                                          │
//! │                                                                     │
//! │  Checkout A ── UPDATE ... quantity = quantity - 1                   │
//! │                WHERE id = ? AND quantity >= 1   → 1 row, commit     │
//! │                                                                     │
//! │  Checkout B ── same UPDATE (after A's commit)   → 0 rows            │
//! │                re-read quantity → 0                                 │
//! │                → InsufficientStock, transaction rolls back          │
//! │                                                                     │
//! │  Exactly one winner; the ledger never oversells.                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atlas_core::{InventoryItem, InventoryItemUpdate, NewInventoryItem};

/// Default low-stock threshold when the caller doesn't set one.
const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

const SELECT_ITEM: &str = "SELECT id, shop_id, brand, model, storage, ram, color, quantity, \
     cost_price_cents, selling_price_cents, low_stock_threshold, created_at, updated_at \
     FROM inventory";

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Adds a stocked item to a shop.
    pub async fn insert(&self, shop_id: &str, new: &NewInventoryItem) -> DbResult<InventoryItem> {
        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            brand: new.brand.clone(),
            model: new.model.clone(),
            storage: new.storage.clone(),
            ram: new.ram.clone(),
            color: new.color.clone(),
            quantity: new.quantity,
            cost_price_cents: new.cost_price_cents,
            selling_price_cents: new.selling_price_cents,
            low_stock_threshold: new
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %item.id, shop_id = %shop_id, brand = %item.brand, model = %item.model, "Inserting inventory item");

        sqlx::query(
            r#"
            INSERT INTO inventory (
                id, shop_id, brand, model, storage, ram, color,
                quantity, cost_price_cents, selling_price_cents,
                low_stock_threshold, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&item.id)
        .bind(&item.shop_id)
        .bind(&item.brand)
        .bind(&item.model)
        .bind(&item.storage)
        .bind(&item.ram)
        .bind(&item.color)
        .bind(item.quantity)
        .bind(item.cost_price_cents)
        .bind(item.selling_price_cents)
        .bind(item.low_stock_threshold)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!("{SELECT_ITEM} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Lists a shop's inventory, newest first.
    pub async fn list_by_shop(&self, shop_id: &str) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "{SELECT_ITEM} WHERE shop_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Applies a partial update; `None` fields are left unchanged.
    /// Bumps `updated_at`.
    pub async fn update(&self, id: &str, changes: &InventoryItemUpdate) -> DbResult<InventoryItem> {
        let mut item = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("InventoryItem", id))?;

        if let Some(brand) = &changes.brand {
            item.brand = brand.clone();
        }
        if let Some(model) = &changes.model {
            item.model = model.clone();
        }
        if let Some(storage) = &changes.storage {
            item.storage = storage.clone();
        }
        if let Some(ram) = &changes.ram {
            item.ram = ram.clone();
        }
        if let Some(color) = &changes.color {
            item.color = Some(color.clone());
        }
        if let Some(quantity) = changes.quantity {
            item.quantity = quantity;
        }
        if let Some(cost) = changes.cost_price_cents {
            item.cost_price_cents = cost;
        }
        if let Some(selling) = changes.selling_price_cents {
            item.selling_price_cents = selling;
        }
        if let Some(threshold) = changes.low_stock_threshold {
            item.low_stock_threshold = threshold;
        }
        item.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE inventory SET
                brand = ?2, model = ?3, storage = ?4, ram = ?5, color = ?6,
                quantity = ?7, cost_price_cents = ?8, selling_price_cents = ?9,
                low_stock_threshold = ?10, updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.brand)
        .bind(&item.model)
        .bind(&item.storage)
        .bind(&item.ram)
        .bind(&item.color)
        .bind(item.quantity)
        .bind(item.cost_price_cents)
        .bind(item.selling_price_cents)
        .bind(item.low_stock_threshold)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Deletes an item. Past sale lines keep their snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", id));
        }

        Ok(())
    }
}

// =============================================================================
// Transaction-scoped stock decrement
// =============================================================================

/// Decrements stock inside an open transaction, refusing to oversell.
///
/// The guard (`quantity >= ?`) makes this the authoritative stock check:
/// whatever the caller read before starting the transaction, the
/// decrement only lands if enough units are still there *now*. When the
/// guard fails the current quantity is re-read (inside the same
/// transaction) so the error names the real availability.
pub(crate) async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
    amount: i64,
) -> DbResult<()> {
    debug!(id = %id, amount = %amount, "Decrementing stock");

    let result = sqlx::query(
        r#"
        UPDATE inventory
        SET quantity = quantity - ?2, updated_at = ?3
        WHERE id = ?1 AND quantity >= ?2
        "#,
    )
    .bind(id)
    .bind(amount)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        let row = sqlx::query_as::<_, InventoryItem>(&format!("{SELECT_ITEM} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        return match row {
            None => Err(DbError::not_found("InventoryItem", id)),
            Some(item) => Err(DbError::InsufficientStock {
                item: item.label(),
                available: item.quantity,
                requested: amount,
            }),
        };
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
