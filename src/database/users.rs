// ABOUTME: User and subscription database operations
// ABOUTME: Handles user registration, lookup, password updates, and the follow relation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

use super::Database;
use crate::models::{User, UserRole};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create user and subscription tables
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                username TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (user_id, author_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username is already taken, or the
    /// database operation fails
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, username, first_name, last_name, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_impl("email", email).await
    }

    /// Internal implementation for getting a user by a unique column
    async fn get_user_impl(&self, field: &str, value: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT id, email, username, first_name, last_name, password_hash, role, created_at
             FROM users WHERE {field} = $1"
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// List users ordered by creation, paginated
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, email, username, first_name, last_name, password_hash, role, created_at
             FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Total number of users
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_users(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Search users by username or email substring (admin console)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn search_users(&self, term: &str) -> Result<Vec<User>> {
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query(
            "SELECT id, email, username, first_name, last_name, password_hash, role, created_at
             FROM users
             WHERE username LIKE $1 ESCAPE '\\' OR email LIKE $1 ESCAPE '\\'
             ORDER BY username",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Replace a user's stored password hash; returns whether the user row
    /// still existed
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Change a user's role (admin console inline edit); returns whether the
    /// user row still existed
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_user_role(&self, user_id: Uuid, role: UserRole) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Create a subscription row; duplicates fail on the unique constraint
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate pair or database failure
    pub async fn subscribe(&self, user_id: Uuid, author_id: Uuid) -> Result<()> {
        sqlx::query("INSERT INTO subscriptions (user_id, author_id, created) VALUES ($1, $2, $3)")
            .bind(user_id.to_string())
            .bind(author_id.to_string())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove a subscription row; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn unsubscribe(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
                .bind(user_id.to_string())
                .bind(author_id.to_string())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `user_id` follows `author_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_subscribed(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM subscriptions WHERE user_id = $1 AND author_id = $2",
        )
        .bind(user_id.to_string())
        .bind(author_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        let n: i64 = row.get("n");
        Ok(n > 0)
    }

    /// Authors the user subscribes to, most recent subscription first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_subscribed_authors(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.role, u.created_at
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.created DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Number of authors the user subscribes to
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_subscriptions(&self, user_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM subscriptions WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Convert a database row to a [`User`]
    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.get("id");
        let role: String = row.get("role");
        let created_at: DateTime<Utc> = row.get("created_at");

        Ok(User {
            id: Uuid::parse_str(&id)?,
            email: row.get("email"),
            username: row.get("username"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row.get("password_hash"),
            role: UserRole::from_str_or_default(&role),
            created_at,
        })
    }
}

/// Escape `%` and `_` for a LIKE pattern
pub(super) fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
