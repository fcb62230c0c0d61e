//! # Auth Extractor
//!
//! Axum extractor that validates the bearer token and hands handlers a
//! [`CurrentUser`]. Protected handlers just take `user: CurrentUser` as
//! an argument; requests without a valid token never reach them.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::error::ApiError;
use crate::state::AppState;

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse a previous extraction on the same request.
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = JwtService::extract_from_header(header)
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?;

        match state.jwt.validate(token) {
            Ok(claims) => {
                let user = CurrentUser::from(claims);
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(JwtError::Expired) => Err(ApiError::unauthorized("Token expired")),
            Err(JwtError::Invalid(reason)) => {
                warn!(uri = %parts.uri, reason = %reason, "Rejected bearer token");
                Err(ApiError::unauthorized("Invalid token"))
            }
        }
    }
}
