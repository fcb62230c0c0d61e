//! # JWT Service
//!
//! Issues and validates HS256 session tokens. The token carries the
//! user's id, username and role; the role is what the redaction layer
//! keys off, so a stale token keeps its old capabilities until expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use atlas_core::{Role, User};

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Token validation failures.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Issues and validates session tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    /// Creates a service signing with the given secret.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        JwtService {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issues a token for a freshly authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| JwtError::Invalid(e.to_string()))
    }

    /// Validates a token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Pulls the token out of an `Authorization: Bearer <token>` header.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "user-1".to_string(),
            username: "admin".to_string(),
            password_hash: String::new(),
            role,
            name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let jwt = JwtService::new("test-secret", 12);
        let token = jwt.issue(&user(Role::Superuser)).unwrap();

        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, Role::Superuser);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = JwtService::new("secret-a", 12).issue(&user(Role::Owner)).unwrap();
        let err = JwtService::new("secret-b", 12).validate(&issued).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let jwt = JwtService::new("test-secret", 12);
        assert!(jwt.validate("not-a-token").is_err());
    }

    #[test]
    fn test_bearer_extraction() {
        assert_eq!(JwtService::extract_from_header("Bearer abc123"), Some("abc123"));
        assert_eq!(JwtService::extract_from_header("Basic abc123"), None);
    }
}
