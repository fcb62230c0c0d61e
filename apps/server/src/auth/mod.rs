//! # Authentication
//!
//! The session boundary: argon2 password verification at login, HS256
//! bearer tokens afterwards. Handlers receive the authenticated
//! principal as a [`CurrentUser`] extractor argument; its role drives
//! authorization and the visibility projection downstream.

pub mod extractor;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtError, JwtService};

use atlas_core::Role;

use crate::error::ApiError;

/// The authenticated principal attached to a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    /// Errors with 403 unless the caller is a superuser.
    pub fn require_superuser(&self) -> Result<(), ApiError> {
        if self.role.is_superuser() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Superuser only"))
        }
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        CurrentUser {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}
