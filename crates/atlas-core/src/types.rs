//! # Domain Types
//!
//! Core domain types used throughout Atlas POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  User ──owns──► Shop ──scopes──► InventoryItem                      │
//! │                   │    ──scopes──► Customer                         │
//! │                   │    ──scopes──► Sale ──contains──► SaleItem      │
//! │                                                                     │
//! │  Sale + SaleItem form the append-only ledger: once committed they   │
//! │  are never updated. SaleItem freezes brand/model/variant/prices at  │
//! │  the time of sale (snapshot pattern).                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has a UUID v4 string `id`, immutable, used for relations.
//! Sales additionally carry a human-readable `invoice_code`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Authenticated principal role.
///
/// ## Capabilities
/// - `Superuser`: administers users, sees every shop, sees cost/profit.
/// - `Owner`: manages only their own shops; cost and profit fields are
///   redacted from every response they receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superuser,
    Owner,
}

impl Role {
    /// Whether this role may see cost prices and profit figures.
    ///
    /// Used by the visibility projection at the API boundary; stored
    /// data always keeps the full figures.
    #[inline]
    pub const fn can_view_profit(&self) -> bool {
        matches!(self, Role::Superuser)
    }

    #[inline]
    pub const fn is_superuser(&self) -> bool {
        matches!(self, Role::Superuser)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Owner
    }
}

// =============================================================================
// User
// =============================================================================

/// An account that can log in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Login name, unique across the system.
    pub username: String,

    /// Argon2 hash. Never serialized; the client only ever sees
    /// [`crate::visibility::UserView`].
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,

    pub role: Role,

    /// Optional display name.
    pub name: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user. The password arrives at the HTTP boundary
/// in plain text and is hashed before this struct is built.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
}

/// Partial update for a user; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
}

// =============================================================================
// Shop
// =============================================================================

/// A tenant: one physical shop owning its inventory, customers and sales.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub name: String,
    /// City / area.
    pub location: String,
    pub address: String,
    pub phone: String,
    pub owner_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for registering a shop. The owner is the authenticated caller,
/// supplied by the server, never by the client.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewShop {
    pub name: String,
    pub location: String,
    pub address: String,
    pub phone: String,
}

/// Partial update for a shop; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShopUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer registered to a shop.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub shop_id: String,
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for registering a customer (standalone or inline at checkout).
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked phone variant: brand/model/storage/RAM/color with quantity
/// and pricing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub shop_id: String,
    pub brand: String,
    pub model: String,
    /// Storage size, e.g. "128GB".
    pub storage: String,
    /// RAM size, e.g. "8GB".
    pub ram: String,
    pub color: Option<String>,
    /// Current stock. Never negative.
    pub quantity: i64,
    /// What the shop paid per unit. Redacted for non-profit-visible roles.
    pub cost_price_cents: i64,
    /// Default selling price per unit.
    pub selling_price_cents: i64,
    /// Stock at or below this level flags the item as low stock.
    pub low_stock_threshold: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// The variant snapshot string carried onto sale items, e.g. "128GB 8GB".
    pub fn variant(&self) -> String {
        format!("{} {}", self.storage, self.ram)
    }

    /// Display label used in stock error messages, e.g. "Apple iPhone 13".
    pub fn label(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    /// Whether current stock is at or below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

/// Input for adding an inventory item.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub ram: String,
    pub color: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    /// Defaults to 5 when omitted.
    pub low_stock_threshold: Option<i64>,
}

/// Partial update for an inventory item; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub storage: Option<String>,
    pub ram: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<i64>,
    pub cost_price_cents: Option<i64>,
    pub selling_price_cents: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale: an immutable ledger entry.
///
/// There is no update path for sales. Totals are computed at checkout
/// and frozen; later inventory edits never affect them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub shop_id: String,
    pub customer_id: String,
    /// Human-readable unique code, e.g. "INV-20260807-3FA9C1".
    pub invoice_code: String,
    /// Σ(unit_price × quantity) across items.
    pub total_amount_cents: i64,
    /// Σ((unit_price − cost_price) × quantity); negative when sold below cost.
    pub total_profit_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total amount as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Returns the total profit as Money.
    #[inline]
    pub fn total_profit(&self) -> Money {
        Money::from_cents(self.total_profit_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze item data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    /// Pointer to the inventory row this line was sold from. Purely
    /// historical; the snapshot columns below carry the ledger data.
    pub inventory_id: String,
    /// Brand at time of sale (frozen).
    pub brand: String,
    /// Model at time of sale (frozen).
    pub model: String,
    /// Storage + RAM at time of sale (frozen).
    pub variant: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Cost price in cents at time of sale (frozen). Redacted for
    /// non-profit-visible roles.
    pub cost_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Line profit: (unit price − cost price) × quantity.
    #[inline]
    pub fn line_profit(&self) -> Money {
        (self.unit_price() - Money::from_cents(self.cost_price_cents))
            .multiply_quantity(self.quantity)
    }
}

/// A sale joined with its customer and line items, as the reporting
/// queries return it. Serialized only through the visibility projection.
#[derive(Debug, Clone)]
pub struct SaleWithDetails {
    pub sale: Sale,
    pub customer: Customer,
    pub items: Vec<SaleItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================
