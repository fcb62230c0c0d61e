//! # atlas-server: HTTP API for Atlas POS
//!
//! The web boundary of the system: an axum JSON API over `atlas-core`
//! and `atlas-db`.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Request                                                            │
//! │    │  tower-http TraceLayer / CorsLayer                             │
//! │    ▼                                                                │
//! │  CurrentUser extractor  ← validates the bearer token                │
//! │    │                                                                │
//! │    ▼                                                                │
//! │  handler (api/) ──► service (services/) ──► repository (atlas-db)   │
//! │    │                                                                │
//! │    ▼                                                                │
//! │  visibility projection (atlas-core) ──► Json response               │
//! │                                                                     │
//! │  Errors at any stage render as { code, message } + status.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Library + binary split: the router lives here so integration tests
//! drive it in-process; `main.rs` only wires config, state and sockets.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;
