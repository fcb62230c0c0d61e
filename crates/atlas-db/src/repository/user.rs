//! # User Repository
//!
//! Database operations for accounts. Passwords arrive here already
//! hashed; this layer never sees plain text.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atlas_core::{NewUser, User, UserUpdate};

const SELECT_USER: &str = "SELECT id, username, password_hash, role, name, created_at FROM users";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// A duplicate username surfaces as [`DbError::UniqueViolation`].
    pub async fn insert(&self, new: &NewUser) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new.username.clone(),
            password_hash: new.password_hash.clone(),
            role: new.role,
            name: new.name.clone(),
            created_at: Utc::now(),
        };

        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role, name, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by username (the login lookup).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = ?1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Lists all users, oldest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Applies a partial update; `None` fields are left unchanged.
    pub async fn update(&self, id: &str, changes: &UserUpdate) -> DbResult<User> {
        let mut user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;

        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(name) = &changes.name {
            user.name = Some(name.clone());
        }

        sqlx::query(
            r#"
            UPDATE users SET username = ?2, password_hash = ?3, role = ?4, name = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.name)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use atlas_core::Role;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "argon2-hash".to_string(),
            role,
            name: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let created = repo.insert(&new_user("admin", Role::Superuser)).await.unwrap();

        let by_name = repo.get_by_username("admin").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.role, Role::Superuser);

        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.insert(&new_user("ali", Role::Owner)).await.unwrap();
        let err = repo.insert(&new_user("ali", Role::Owner)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let user = repo.insert(&new_user("ali", Role::Owner)).await.unwrap();
        let updated = repo
            .update(
                &user.id,
                &UserUpdate {
                    name: Some("Ali Raza".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "ali");
        assert_eq!(updated.name.as_deref(), Some("Ali Raza"));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.users().delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
