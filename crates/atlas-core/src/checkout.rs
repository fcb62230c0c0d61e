//! # Checkout Pricing
//!
//! Pure computation for the sale/checkout path: given the current
//! inventory snapshots and the requested cart, validate the request and
//! produce priced, snapshot-carrying lines plus sale totals.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Data Flow                             │
//! │                                                                     │
//! │  HTTP handler                                                       │
//! │       │  CheckoutRequest (typed, deserialized)                      │
//! │       ▼                                                             │
//! │  CheckoutService (apps/server)                                      │
//! │       │  loads customer + inventory snapshots                       │
//! │       ▼                                                             │
//! │  price_checkout()  ← THIS MODULE (no side effects)                  │
//! │       │  PricedCheckout                                             │
//! │       ▼                                                             │
//! │  SaleRepository::create_sale (atlas-db)                             │
//! │       └─ one transaction: insert header + items, decrement stock    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock check here is advisory: it fails fast on data the caller
//! just read. The authoritative check is the guarded decrement inside
//! the database transaction, which re-validates against concurrent
//! sales.
//!
//! ## Pricing Rules
//! - Unit price: caller override when present, else the item's current
//!   selling price. Overrides let the counter negotiate.
//! - Cost price: always taken from the inventory row, never from the
//!   client. A client-supplied cost would let a caller fabricate profit.
//! - All arithmetic in integer cents; totals accumulate before any
//!   formatting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::InventoryItem;
use crate::validation::{validate_price_cents, validate_quantity};

// =============================================================================
// Request Types
// =============================================================================

/// One requested cart line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub inventory_id: String,
    pub quantity: i64,
    /// Optional negotiated price; falls back to the item's selling price.
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
}

/// A checkout request as it arrives at the service boundary.
///
/// `customer_id` is required: every sale is attached to a customer
/// record, walk-ins included (the UI creates one inline).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub items: Vec<CheckoutLine>,
}

// =============================================================================
// Priced Output
// =============================================================================

/// A fully priced line carrying the inventory snapshot that will be
/// frozen onto the sale item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub inventory_id: String,
    pub brand: String,
    pub model: String,
    pub variant: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub cost_price_cents: i64,
}

impl PricedLine {
    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }

    /// Line profit: (unit price − cost price) × quantity.
    #[inline]
    pub fn line_profit(&self) -> Money {
        (Money::from_cents(self.unit_price_cents) - Money::from_cents(self.cost_price_cents))
            .multiply_quantity(self.quantity)
    }
}

/// The priced cart: validated lines plus accumulated totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCheckout {
    pub lines: Vec<PricedLine>,
    pub total_amount_cents: i64,
    pub total_profit_cents: i64,
}

// =============================================================================
// Pricing
// =============================================================================

/// Validates a checkout request against inventory snapshots and prices it.
///
/// Deterministic and side-effect free: same inputs, same output, nothing
/// written anywhere.
///
/// ## Failure Modes
/// - [`CoreError::EmptyCheckout`]: no lines.
/// - [`CoreError::Validation`]: non-positive/oversized quantity, negative
///   price override.
/// - [`CoreError::ItemNotFound`]: a line references an id absent from
///   `items` (the caller passes only items that exist in the shop).
/// - [`CoreError::InsufficientStock`]: requested quantity exceeds the
///   snapshot's stock. Lines referencing the same item are summed first,
///   so a cart cannot sneak past the check by splitting one item across
///   lines.
pub fn price_checkout(
    items: &[InventoryItem],
    request: &CheckoutRequest,
) -> CoreResult<PricedCheckout> {
    if request.items.is_empty() {
        return Err(CoreError::EmptyCheckout);
    }

    let by_id: HashMap<&str, &InventoryItem> =
        items.iter().map(|item| (item.id.as_str(), item)).collect();

    // Total requested per inventory id, across all lines so far.
    let mut requested: HashMap<&str, i64> = HashMap::new();

    let mut lines = Vec::with_capacity(request.items.len());
    let mut total_amount = Money::zero();
    let mut total_profit = Money::zero();

    for line in &request.items {
        validate_quantity(line.quantity)?;
        if let Some(price) = line.unit_price_cents {
            validate_price_cents("unitPrice", price)?;
        }

        let item = by_id
            .get(line.inventory_id.as_str())
            .copied()
            .ok_or_else(|| CoreError::ItemNotFound(line.inventory_id.clone()))?;

        let asked = requested
            .entry(item.id.as_str())
            .and_modify(|total| *total += line.quantity)
            .or_insert(line.quantity);
        if *asked > item.quantity {
            return Err(CoreError::InsufficientStock {
                item: item.label(),
                available: item.quantity,
                requested: *asked,
            });
        }

        let unit_price_cents = line.unit_price_cents.unwrap_or(item.selling_price_cents);
        let priced = PricedLine {
            inventory_id: item.id.clone(),
            brand: item.brand.clone(),
            model: item.model.clone(),
            variant: item.variant(),
            quantity: line.quantity,
            unit_price_cents,
            cost_price_cents: item.cost_price_cents,
        };

        total_amount += priced.line_total();
        total_profit += priced.line_profit();
        lines.push(priced);
    }

    Ok(PricedCheckout {
        lines,
        total_amount_cents: total_amount.cents(),
        total_profit_cents: total_profit.cents(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: &str, quantity: i64, selling: i64, cost: i64) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            shop_id: "shop-1".to_string(),
            brand: "Apple".to_string(),
            model: "iPhone 13".to_string(),
            storage: "128GB".to_string(),
            ram: "4GB".to_string(),
            color: None,
            quantity,
            cost_price_cents: cost,
            selling_price_cents: selling,
            low_stock_threshold: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(items: Vec<CheckoutLine>) -> CheckoutRequest {
        CheckoutRequest {
            customer_id: "cust-1".to_string(),
            items,
        }
    }

    fn line(inventory_id: &str, quantity: i64) -> CheckoutLine {
        CheckoutLine {
            inventory_id: inventory_id.to_string(),
            quantity,
            unit_price_cents: None,
        }
    }

    #[test]
    fn test_prices_the_worked_example() {
        // Stock 10, price 100.00, cost 70.00; selling 3 units.
        let items = vec![item("a", 10, 100_00, 70_00)];
        let priced = price_checkout(&items, &request(vec![line("a", 3)])).unwrap();

        assert_eq!(priced.total_amount_cents, 300_00);
        assert_eq!(priced.total_profit_cents, 90_00);
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].variant, "128GB 4GB");
        assert_eq!(priced.lines[0].cost_price_cents, 70_00);
    }

    #[test]
    fn test_totals_sum_across_lines() {
        let items = vec![item("a", 10, 100_00, 70_00), item("b", 4, 50_00, 60_00)];
        let priced =
            price_checkout(&items, &request(vec![line("a", 2), line("b", 1)])).unwrap();

        assert_eq!(priced.total_amount_cents, 2 * 100_00 + 50_00);
        // Second line sold below cost: 2*30.00 + (-10.00)
        assert_eq!(priced.total_profit_cents, 60_00 - 10_00);
    }

    #[test]
    fn test_price_override_wins_and_cost_is_server_derived() {
        let items = vec![item("a", 10, 100_00, 70_00)];
        let mut l = line("a", 1);
        l.unit_price_cents = Some(90_00);
        let priced = price_checkout(&items, &request(vec![l])).unwrap();

        assert_eq!(priced.lines[0].unit_price_cents, 90_00);
        // Cost always comes from the inventory row.
        assert_eq!(priced.lines[0].cost_price_cents, 70_00);
        assert_eq!(priced.total_profit_cents, 20_00);
    }

    #[test]
    fn test_negative_override_rejected() {
        let items = vec![item("a", 10, 100_00, 70_00)];
        let mut l = line("a", 1);
        l.unit_price_cents = Some(-1);
        let err = price_checkout(&items, &request(vec![l])).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_empty_checkout_rejected() {
        let err = price_checkout(&[], &request(vec![])).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCheckout));
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        let items = vec![item("a", 10, 100_00, 70_00)];
        assert!(price_checkout(&items, &request(vec![line("a", 0)])).is_err());
        assert!(price_checkout(&items, &request(vec![line("a", -2)])).is_err());
    }

    #[test]
    fn test_unknown_item_rejected() {
        let items = vec![item("a", 10, 100_00, 70_00)];
        let err = price_checkout(&items, &request(vec![line("missing", 1)])).unwrap_err();
        match err {
            CoreError::ItemNotFound(id) => assert_eq!(id, "missing"),
            other => panic!("expected ItemNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_oversell_rejected_with_context() {
        let items = vec![item("a", 10, 100_00, 70_00)];
        let err = price_checkout(&items, &request(vec![line("a", 11)])).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                item,
                available,
                requested,
            } => {
                assert_eq!(item, "Apple iPhone 13");
                assert_eq!(available, 10);
                assert_eq!(requested, 11);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_split_lines_cannot_bypass_stock_check() {
        // 6 + 5 = 11 > 10, even though each line alone fits.
        let items = vec![item("a", 10, 100_00, 70_00)];
        let err =
            price_checkout(&items, &request(vec![line("a", 6), line("a", 5)])).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { requested: 11, .. }));
    }
}
