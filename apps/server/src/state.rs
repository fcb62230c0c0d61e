//! # Application State
//!
//! Shared state injected into handlers. Built once at startup by `main`
//! and cloned per request (both members are cheap to clone). Nothing in
//! the application reaches for a global; the database handle travels
//! through this struct.

use atlas_db::Database;

use crate::auth::JwtService;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (pooled, reference-counted).
    pub db: Database,

    /// Session token signer/verifier.
    pub jwt: JwtService,
}

impl AppState {
    /// Creates the application state.
    pub fn new(db: Database, jwt: JwtService) -> Self {
        AppState { db, jwt }
    }
}
