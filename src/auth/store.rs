// src/auth/store.rs

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::types::{Identity, Instructor, Role};
use crate::error::{AppError, AppResult};

pub struct AuthStore {
    pool: SqlitePool,
}

impl AuthStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve an opaque bearer token to a user identity. `None` means
    /// the token is unknown or revoked, not an error.
    pub async fn resolve_token(&self, token: &str) -> AppResult<Option<Identity>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.name, u.role
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Identity {
            id: row.get("id"),
            name: row.get("name"),
            role: row
                .get::<String, _>("role")
                .parse()
                .unwrap_or(Role::Student),
        }))
    }

    /// Directory of users a session can be submitted to, ordered by name.
    pub async fn list_instructors(&self) -> AppResult<Vec<Instructor>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email
            FROM users
            WHERE role IN ('instructor', 'admin')
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Instructor {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
            })
            .collect())
    }

    /// Create a user record. Account provisioning proper (passwords,
    /// external auth) is out of scope; this backs seeding and tests.
    pub async fn create_user(&self, name: &str, email: &str, role: Role) -> AppResult<Identity> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(AppError::validation("User name and email are required"));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO users (id, name, email, role, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(email)
            .bind(role.to_string())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(Identity {
            id,
            name: name.to_string(),
            role,
        })
    }

    /// Issue a bearer token for a user.
    pub async fn issue_token(&self, user_id: &str) -> AppResult<String> {
        let token = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO auth_tokens (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(token)
    }
}
