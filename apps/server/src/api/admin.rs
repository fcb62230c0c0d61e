//! # Admin Handlers
//!
//! User management, superuser only. Responses carry [`UserView`] so
//! password hashes never leave the process.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use atlas_core::validation::validate_username;
use atlas_core::{NewUser, Role, UserUpdate, UserView};

use crate::auth::password::hash_password;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
}

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    current.require_superuser()?;

    validate_username(&request.username)?;
    validate_password(&request.password)?;

    let user = state
        .db
        .users()
        .insert(&NewUser {
            username: request.username.trim().to_string(),
            password_hash: hash_password(&request.password)?,
            role: request.role,
            name: request.name,
        })
        .await?;

    info!(username = %user.username, role = ?user.role, by = %current.username, "User created");

    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<UserView>>> {
    current.require_superuser()?;

    let users = state.db.users().list().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserView>> {
    current.require_superuser()?;

    if let Some(username) = &request.username {
        validate_username(username)?;
    }
    let password_hash = match &request.password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = state
        .db
        .users()
        .update(
            &id,
            &UserUpdate {
                username: request.username,
                password_hash,
                role: request.role,
                name: request.name,
            },
        )
        .await?;

    info!(user_id = %id, by = %current.username, "User updated");

    Ok(Json(UserView::from(user)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    current.require_superuser()?;

    if id == current.id {
        return Err(ApiError::validation("Cannot delete your own account"));
    }

    state.db.users().delete(&id).await?;

    info!(user_id = %id, by = %current.username, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
