//! # Visibility Projection
//!
//! The single place where role-based redaction happens.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   What Each Role Sees                               │
//! │                                                                     │
//! │  Field                        Superuser        Owner                │
//! │  ───────────────────────────  ─────────        ─────                │
//! │  Sale.totalAmount             ✓                ✓                    │
//! │  Sale.totalProfit             ✓                (omitted)            │
//! │  SaleItem.unitPrice           ✓                ✓                    │
//! │  SaleItem.costPrice           ✓                (omitted)            │
//! │  InventoryItem.sellingPrice   ✓                ✓                    │
//! │  InventoryItem.costPrice      ✓                (omitted)            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Redaction is a projection at the boundary: stored rows always keep
//! the full figures, and redacted fields are absent from the JSON (not
//! null, not zero). Handlers must never serialize the raw entity types
//! for cost/profit-bearing data; they go through these views.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::types::{Customer, InventoryItem, Role, SaleItem, SaleWithDetails, User};

// =============================================================================
// User View
// =============================================================================

/// A user as the API returns it: everything except the password hash.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            role: user.role,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

// =============================================================================
// Inventory View
// =============================================================================

/// An inventory item projected for a caller role.
///
/// Adds the derived `low_stock` flag; omits the cost price for roles
/// without profit visibility.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemView {
    pub id: String,
    pub shop_id: String,
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub ram: String,
    pub color: Option<String>,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price_cents: Option<i64>,
    pub selling_price_cents: i64,
    pub low_stock_threshold: i64,
    pub low_stock: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItemView {
    /// Projects an inventory item for the given caller role.
    pub fn project(item: InventoryItem, role: Role) -> Self {
        let low_stock = item.is_low_stock();
        InventoryItemView {
            id: item.id,
            shop_id: item.shop_id,
            brand: item.brand,
            model: item.model,
            storage: item.storage,
            ram: item.ram,
            color: item.color,
            quantity: item.quantity,
            cost_price_cents: role.can_view_profit().then_some(item.cost_price_cents),
            selling_price_cents: item.selling_price_cents,
            low_stock_threshold: item.low_stock_threshold,
            low_stock,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// =============================================================================
// Sale Views
// =============================================================================

/// A sale line projected for a caller role.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemView {
    pub id: String,
    pub sale_id: String,
    pub inventory_id: String,
    pub brand: String,
    pub model: String,
    pub variant: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price_cents: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleItemView {
    fn project(item: SaleItem, role: Role) -> Self {
        SaleItemView {
            id: item.id,
            sale_id: item.sale_id,
            inventory_id: item.inventory_id,
            brand: item.brand,
            model: item.model,
            variant: item.variant,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            cost_price_cents: role.can_view_profit().then_some(item.cost_price_cents),
            created_at: item.created_at,
        }
    }
}

/// A sale with nested customer and items, projected for a caller role.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub id: String,
    pub shop_id: String,
    pub customer_id: String,
    pub invoice_code: String,
    pub total_amount_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_profit_cents: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub customer: Customer,
    pub items: Vec<SaleItemView>,
}

impl SaleView {
    /// Projects a sale (header + customer + items) for the given role.
    pub fn project(detail: SaleWithDetails, role: Role) -> Self {
        let SaleWithDetails {
            sale,
            customer,
            items,
        } = detail;
        SaleView {
            id: sale.id,
            shop_id: sale.shop_id,
            customer_id: sale.customer_id,
            invoice_code: sale.invoice_code,
            total_amount_cents: sale.total_amount_cents,
            total_profit_cents: role.can_view_profit().then_some(sale.total_profit_cents),
            created_at: sale.created_at,
            customer,
            items: items
                .into_iter()
                .map(|item| SaleItemView::project(item, role))
                .collect(),
        }
    }

}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sale;

    fn detail() -> SaleWithDetails {
        let now = Utc::now();
        SaleWithDetails {
            sale: Sale {
                id: "sale-1".to_string(),
                shop_id: "shop-1".to_string(),
                customer_id: "cust-1".to_string(),
                invoice_code: "INV-20260807-AB12CD".to_string(),
                total_amount_cents: 300_00,
                total_profit_cents: 90_00,
                created_at: now,
            },
            customer: Customer {
                id: "cust-1".to_string(),
                shop_id: "shop-1".to_string(),
                name: "Hamza".to_string(),
                mobile: "0300-1234567".to_string(),
                address: None,
                created_at: now,
            },
            items: vec![SaleItem {
                id: "line-1".to_string(),
                sale_id: "sale-1".to_string(),
                inventory_id: "inv-1".to_string(),
                brand: "Apple".to_string(),
                model: "iPhone 13".to_string(),
                variant: "128GB 4GB".to_string(),
                quantity: 3,
                unit_price_cents: 100_00,
                cost_price_cents: 70_00,
                created_at: now,
            }],
        }
    }

    #[test]
    fn test_superuser_sees_profit_fields() {
        let view = SaleView::project(detail(), Role::Superuser);
        assert_eq!(view.total_profit_cents, Some(90_00));
        assert_eq!(view.items[0].cost_price_cents, Some(70_00));
    }

    #[test]
    fn test_owner_profit_fields_absent_from_json() {
        let view = SaleView::project(detail(), Role::Owner);
        assert_eq!(view.total_profit_cents, None);
        assert_eq!(view.items[0].cost_price_cents, None);

        // Absent means absent: the keys must not appear on the wire at all.
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("totalProfitCents"));
        assert!(!json.contains("costPriceCents"));
        assert!(json.contains("totalAmountCents"));
        assert!(json.contains("unitPriceCents"));
    }

    #[test]
    fn test_inventory_projection() {
        let now = Utc::now();
        let item = InventoryItem {
            id: "inv-1".to_string(),
            shop_id: "shop-1".to_string(),
            brand: "Samsung".to_string(),
            model: "A54".to_string(),
            storage: "256GB".to_string(),
            ram: "8GB".to_string(),
            color: Some("Silver".to_string()),
            quantity: 2,
            cost_price_cents: 500_00,
            selling_price_cents: 650_00,
            low_stock_threshold: 5,
            created_at: now,
            updated_at: now,
        };

        let owner = InventoryItemView::project(item.clone(), Role::Owner);
        assert_eq!(owner.cost_price_cents, None);
        assert!(owner.low_stock);

        let superuser = InventoryItemView::project(item, Role::Superuser);
        assert_eq!(superuser.cost_price_cents, Some(500_00));
    }
}
