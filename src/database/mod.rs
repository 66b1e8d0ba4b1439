// ABOUTME: Database layer entry point owning the SQLite pool and schema migrations
// ABOUTME: Domain-specific operations live in the users, catalog, and recipes submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! # Database Management
//!
//! This module provides storage for the Foodgram server. All operations are
//! methods on [`Database`], split across per-domain files. The schema is
//! created idempotently at startup; uniqueness constraints on the join
//! tables are the sole concurrency-safety mechanism for toggles.

mod catalog;
mod recipes;
mod users;

pub use recipes::RecipeFilter;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for users, recipes, and the ingredient/tag catalog
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await?;

        // User and subscription tables
        self.migrate_users().await?;

        // Tag and ingredient catalog
        self.migrate_catalog().await?;

        // Recipes, line items, favorites, and cart
        self.migrate_recipes().await?;

        Ok(())
    }
}
