//! # atlas-core: Pure Business Logic for Atlas POS
//!
//! This crate is the **heart** of Atlas POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Atlas POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                 Web Client (TypeScript)                     │   │
//! │  │   Login ──► Inventory ──► Checkout ──► Reports/Invoices     │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │ HTTP/JSON                           │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                 apps/server (axum handlers)                 │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │              ★ atlas-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────────────┐   │   │
//! │  │  │  types  │ │  money  │ │ checkout │ │   visibility   │   │   │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └────────────────┘   │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                 atlas-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, repositories          │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Shop, InventoryItem, Sale, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation rules
//! - [`checkout`] - Pure checkout pricing and stock validation
//! - [`visibility`] - Role-based projection of cost/profit fields
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;
pub mod visibility;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{price_checkout, CheckoutLine, CheckoutRequest, PricedCheckout, PricedLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use visibility::{InventoryItemView, SaleItemView, SaleView, UserView};
