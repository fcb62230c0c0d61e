//! # Auth Handlers
//!
//! Login and principal introspection. Failed logins return the same
//! message whether the username or the password was wrong.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use atlas_core::UserView;

use crate::auth::password::verify_password;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .db
        .users()
        .get_by_username(request.username.trim())
        .await?;

    let user = match user {
        Some(user) if verify_password(&request.password, &user.password_hash) => user,
        _ => {
            warn!(username = %request.username, "Failed login attempt");
            return Err(ApiError::unauthorized("Invalid username or password"));
        }
    };

    let token = state
        .jwt
        .issue(&user)
        .map_err(|_| ApiError::internal())?;

    info!(username = %user.username, role = ?user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserView::from(user),
    }))
}

/// GET /api/auth/me - the principal behind the presented token.
pub async fn me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<UserView>> {
    // Re-read from storage so role/name changes show up before the
    // token is reissued.
    let user = state
        .db
        .users()
        .get_by_id(&current.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    Ok(Json(UserView::from(user)))
}
