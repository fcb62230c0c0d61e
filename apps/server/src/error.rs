//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Atlas POS                          │
//! │                                                                     │
//! │  handler returns ApiResult<T>                                       │
//! │       │                                                             │
//! │       ├── CoreError  (business rule)  ──┐                           │
//! │       ├── DbError    (persistence)    ──┼──► ApiError ──► JSON      │
//! │       └── auth failures               ──┘        │                  │
//! │                                                  ▼                  │
//! │                              { "code": "...", "message": "..." }    │
//! │                              + the matching HTTP status             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping
//! validation → 400, unauthenticated → 401, forbidden → 403,
//! not-found → 404, conflict → 409, insufficient stock → 422,
//! everything internal → 500 with a generic message (details go to the
//! log, never to the client).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use atlas_core::CoreError;
use atlas_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// { "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Apple iPhone 13: available 3, requested 5" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Missing or invalid credentials (401)
    Unauthorized,

    /// Authenticated but not allowed (403)
    Forbidden,

    /// Duplicate value or write contention; retry may succeed (409)
    Conflict,

    /// Business-rule stock violation (422)
    InsufficientStock,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// The HTTP status this code maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates an internal error with a generic client-facing message.
    pub fn internal() -> Self {
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::InsufficientStock {
                item,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: available {}, requested {}",
                    item, available, requested
                ),
            ),
            DbError::Conflict(e) => {
                tracing::warn!("Transaction conflict: {}", e);
                ApiError::new(
                    ErrorCode::Conflict,
                    "The sale could not be recorded due to concurrent activity; please retry",
                )
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e)
            | DbError::MigrationFailed(e)
            | DbError::QueryFailed(e)
            | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database error: {}", e);
                ApiError::internal()
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::internal()
            }
        }
    }
}

/// Converts core business errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => ApiError::not_found("InventoryItem", &id),
            CoreError::InsufficientStock {
                item,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: available {}, requested {}",
                    item, available, requested
                ),
            ),
            CoreError::EmptyCheckout => {
                ApiError::validation("Checkout must contain at least one item")
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<atlas_core::ValidationError> for ApiError {
    fn from(err: atlas_core::ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for HTTP handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
