//! # Repository Module
//!
//! Database repository implementations for Atlas POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                               │
//! │                                                                     │
//! │  HTTP handler / service                                             │
//! │       │                                                             │
//! │       │  db.inventory().list_by_shop(shop_id)                       │
//! │       ▼                                                             │
//! │  InventoryRepository                                                │
//! │  ├── list_by_shop(&self, shop_id)                                   │
//! │  ├── get_by_id(&self, id)                                           │
//! │  ├── insert(&self, shop_id, item)                                   │
//! │  └── update(&self, id, changes)                                     │
//! │       │                                                             │
//! │       │  SQL query                                                  │
//! │       ▼                                                             │
//! │  SQLite database                                                    │
//! │                                                                     │
//! │  Benefits: SQL is isolated in one place; services stay testable.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Accounts and roles
//! - [`shop::ShopRepository`] - Shop (tenant) CRUD
//! - [`customer::CustomerRepository`] - Customer CRUD and search
//! - [`inventory::InventoryRepository`] - Stock CRUD and guarded decrement
//! - [`sale::SaleRepository`] - The checkout transaction and the sales ledger

pub mod customer;
pub mod inventory;
pub mod sale;
pub mod shop;
pub mod user;
