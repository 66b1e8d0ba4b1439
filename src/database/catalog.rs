// ABOUTME: Tag and ingredient catalog database operations
// ABOUTME: Handles reference-data reads, admin mutations, prefix search, and seed imports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

use super::users::escape_like;
use super::Database;
use crate::models::{Ingredient, Tag};
use anyhow::Result;
use sqlx::Row;

impl Database {
    /// Create tag and ingredient tables
    pub(super) async fn migrate_catalog(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                color TEXT UNIQUE NOT NULL,
                slug TEXT UNIQUE NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                measurement_unit TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All tags, unpaginated
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, color, slug FROM tags ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_tag).collect())
    }

    /// Get a tag by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_tag(&self, tag_id: i64) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_tag))
    }

    /// Insert a tag (admin only at the route layer)
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate name/color/slug or database failure
    pub async fn create_tag(&self, name: &str, color: &str, slug: &str) -> Result<Tag> {
        let result = sqlx::query("INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(color)
            .bind(slug)
            .execute(&self.pool)
            .await?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            color: color.to_owned(),
            slug: slug.to_owned(),
        })
    }

    /// Update a tag in place; returns whether the tag row still existed
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_tag(&self, tag: &Tag) -> Result<bool> {
        let result =
            sqlx::query("UPDATE tags SET name = $2, color = $3, slug = $4 WHERE id = $1")
                .bind(tag.id)
                .bind(&tag.name)
                .bind(&tag.color)
                .bind(&tag.slug)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a tag
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_tag(&self, tag_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(tag_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-insert seed tags from `(slug, name, color)` records
    ///
    /// # Errors
    ///
    /// Returns an error on a constraint violation or database failure
    pub async fn bulk_insert_tags(&self, records: &[(String, String, String)]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        for (slug, name, color) in records {
            sqlx::query("INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3)")
                .bind(name)
                .bind(color)
                .bind(slug)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(records.len() as u64)
    }

    /// Ingredients, optionally restricted to a case-insensitive name prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>> {
        let rows = match name_prefix {
            Some(prefix) => {
                // Prefix-only match: interior occurrences must not qualify
                let pattern = format!("{}%", escape_like(prefix));
                sqlx::query(
                    "SELECT id, name, measurement_unit FROM ingredients
                     WHERE name LIKE $1 ESCAPE '\\' COLLATE NOCASE
                     ORDER BY name",
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, name, measurement_unit FROM ingredients ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(row_to_ingredient).collect())
    }

    /// Get an ingredient by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_ingredient(&self, ingredient_id: i64) -> Result<Option<Ingredient>> {
        let row =
            sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
                .bind(ingredient_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.as_ref().map(row_to_ingredient))
    }

    /// Insert an ingredient (admin only at the route layer)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn create_ingredient(&self, name: &str, measurement_unit: &str) -> Result<Ingredient> {
        let result =
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)")
                .bind(name)
                .bind(measurement_unit)
                .execute(&self.pool)
                .await?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        })
    }

    /// Update an ingredient in place; returns whether the ingredient row
    /// still existed
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_ingredient(&self, ingredient: &Ingredient) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE ingredients SET name = $2, measurement_unit = $3 WHERE id = $1",
        )
        .bind(ingredient.id)
        .bind(&ingredient.name)
        .bind(&ingredient.measurement_unit)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_ingredient(&self, ingredient_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(ingredient_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-insert seed ingredients from `(name, measurement_unit)` records
    ///
    /// # Errors
    ///
    /// Returns an error on database failure
    pub async fn bulk_insert_ingredients(&self, records: &[(String, String)]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        for (name, unit) in records {
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)")
                .bind(name)
                .bind(unit)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(records.len() as u64)
    }

    /// Search tags by name or slug substring (admin console)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn search_tags(&self, term: &str) -> Result<Vec<Tag>> {
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query(
            "SELECT id, name, color, slug FROM tags
             WHERE name LIKE $1 ESCAPE '\\' COLLATE NOCASE
                OR slug LIKE $1 ESCAPE '\\' COLLATE NOCASE
             ORDER BY name",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_tag).collect())
    }

    /// Search ingredients by name substring (admin console)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn search_ingredients(&self, term: &str) -> Result<Vec<Ingredient>> {
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query(
            "SELECT id, name, measurement_unit FROM ingredients
             WHERE name LIKE $1 ESCAPE '\\' COLLATE NOCASE
             ORDER BY name",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_ingredient).collect())
    }
}

fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        color: row.get("color"),
        slug: row.get("slug"),
    }
}

fn row_to_ingredient(row: &sqlx::sqlite::SqliteRow) -> Ingredient {
    Ingredient {
        id: row.get("id"),
        name: row.get("name"),
        measurement_unit: row.get("measurement_unit"),
    }
}
