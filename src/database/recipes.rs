// ABOUTME: Recipe database operations: CRUD, line items, favorites, cart, and aggregation
// ABOUTME: Recipe writes run in one transaction; updates replace tags and lines wholesale
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

use super::Database;
use crate::models::{IngredientLine, Recipe, ShoppingListEntry, Tag};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

/// The two user-recipe join relations share one toggle implementation
#[derive(Debug, Clone, Copy)]
pub(crate) enum UserRecipeRelation {
    /// Bookmarks
    Favorite,
    /// Shopping-cart markers
    Cart,
}

impl UserRecipeRelation {
    const fn table(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::Cart => "shopping_cart",
        }
    }
}

/// Predicate composition for the recipe listing
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Exact match on author
    pub author: Option<Uuid>,
    /// OR-match across tag slugs
    pub tag_slugs: Vec<String>,
    /// Restrict to recipes favorited by this user
    pub favorited_by: Option<Uuid>,
    /// Restrict to recipes in this user's cart
    pub in_cart_of: Option<Uuid>,
}

impl RecipeFilter {
    fn where_clause(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(author) = self.author {
            conditions.push("r.author_id = ?".to_owned());
            binds.push(author.to_string());
        }

        if !self.tag_slugs.is_empty() {
            let placeholders = vec!["?"; self.tag_slugs.len()].join(", ");
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id
                 WHERE rt.recipe_id = r.id AND t.slug IN ({placeholders}))"
            ));
            binds.extend(self.tag_slugs.iter().cloned());
        }

        if let Some(user) = self.favorited_by {
            conditions.push(
                "EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ?)"
                    .to_owned(),
            );
            binds.push(user.to_string());
        }

        if let Some(user) = self.in_cart_of {
            conditions.push(
                "EXISTS (SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = ?)"
                    .to_owned(),
            );
            binds.push(user.to_string());
        }

        if conditions.is_empty() {
            (String::new(), binds)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), binds)
        }
    }
}

impl Database {
    /// Create recipe, line-item, favorite, and cart tables
    pub(super) async fn migrate_recipes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                image TEXT,
                text TEXT NOT NULL,
                cooking_time INTEGER NOT NULL,
                pub_date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                UNIQUE (recipe_id, tag_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL,
                UNIQUE (recipe_id, ingredient_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        for table in ["favorites", "shopping_cart"] {
            sqlx::query(&format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    UNIQUE (user_id, recipe_id)
                )
                "
            ))
            .execute(&self.pool)
            .await?;
        }

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_pub_date ON recipes(pub_date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a recipe with its tag set and ingredient lines in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error on constraint violation or database failure
    pub async fn create_recipe(
        &self,
        author_id: Uuid,
        name: &str,
        image: Option<&str>,
        text: &str,
        cooking_time: u32,
        tag_ids: &[i64],
        lines: &[(i64, u32)],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, image, text, cooking_time, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id.to_string())
        .bind(name)
        .bind(image)
        .bind(text)
        .bind(i64::from(cooking_time))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let recipe_id = result.last_insert_rowid();

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        for (ingredient_id, amount) in lines {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(i64::from(*amount))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(recipe_id)
    }

    /// Update a recipe's scalar fields and replace its tag set and ingredient
    /// lines wholesale, all in one transaction. `pub_date` is never touched.
    /// Returns whether the recipe still existed; a concurrent delete yields
    /// `false` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        name: &str,
        image: Option<&str>,
        text: &str,
        cooking_time: u32,
        tag_ids: &[i64],
        lines: &[(i64, u32)],
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE recipes SET name = $2, image = $3, text = $4, cooking_time = $5 WHERE id = $1",
        )
        .bind(recipe_id)
        .bind(name)
        .bind(image)
        .bind(text)
        .bind(i64::from(cooking_time))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
        for tag_id in tag_ids {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        // Replace-all-lines semantics: no diffing against the previous set
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
        for (ingredient_id, amount) in lines {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(i64::from(*amount))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a recipe together with its line items and join rows
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_recipe(&self, recipe_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // Join rows are removed explicitly; FK cascades only fire on
        // connections where the foreign_keys pragma happens to be on
        for table in ["recipe_tags", "recipe_ingredients", "favorites", "shopping_cart"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE recipe_id = $1"))
                .bind(recipe_id)
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a recipe by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe(&self, recipe_id: i64) -> Result<Option<Recipe>> {
        let row = sqlx::query(
            "SELECT id, author_id, name, image, text, cooking_time, pub_date
             FROM recipes WHERE id = $1",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_recipe).transpose()
    }

    /// Filtered recipe listing, newest first, paginated
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Recipe>> {
        let (where_clause, binds) = filter.where_clause();
        let sql = format!(
            "SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.pub_date
             FROM recipes r {where_clause}
             ORDER BY r.pub_date DESC, r.id DESC
             LIMIT ? OFFSET ?"
        );

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Number of recipes matching the filter
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_recipes(&self, filter: &RecipeFilter) -> Result<i64> {
        let (where_clause, binds) = filter.where_clause();
        let sql = format!("SELECT COUNT(*) AS n FROM recipes r {where_clause}");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.get("n"))
    }

    /// Most recent recipes by an author, optionally capped
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipes_by_author(&self, author_id: Uuid, limit: Option<i64>) -> Result<Vec<Recipe>> {
        let rows = sqlx::query(
            "SELECT id, author_id, name, image, text, cooking_time, pub_date
             FROM recipes WHERE author_id = $1
             ORDER BY pub_date DESC, id DESC
             LIMIT $2",
        )
        .bind(author_id.to_string())
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Total recipe count for an author
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn author_recipe_count(&self, author_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM recipes WHERE author_id = $1")
            .bind(author_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Tags attached to a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipe_tags(&self, recipe_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT t.id, t.name, t.color, t.slug
             FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id
             WHERE rt.recipe_id = $1 ORDER BY t.id",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Tag {
                id: row.get("id"),
                name: row.get("name"),
                color: row.get("color"),
                slug: row.get("slug"),
            })
            .collect())
    }

    /// Ingredient lines of a recipe with denormalized names and units
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipe_ingredient_lines(&self, recipe_id: i64) -> Result<Vec<IngredientLine>> {
        let rows = sqlx::query(
            "SELECT ri.ingredient_id, i.name, i.measurement_unit, ri.amount
             FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = $1 ORDER BY i.name",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| IngredientLine {
                ingredient_id: row.get("ingredient_id"),
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                amount: row.get::<i64, _>("amount") as u32,
            })
            .collect())
    }

    /// Add a favorite row; duplicates fail on the unique constraint
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate pair or database failure
    pub async fn add_favorite(&self, user_id: Uuid, recipe_id: i64) -> Result<()> {
        self.add_user_recipe(UserRecipeRelation::Favorite, user_id, recipe_id)
            .await
    }

    /// Remove a favorite row; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn remove_favorite(&self, user_id: Uuid, recipe_id: i64) -> Result<bool> {
        self.remove_user_recipe(UserRecipeRelation::Favorite, user_id, recipe_id)
            .await
    }

    /// Whether the user favorited the recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_favorited(&self, user_id: Uuid, recipe_id: i64) -> Result<bool> {
        self.has_user_recipe(UserRecipeRelation::Favorite, user_id, recipe_id)
            .await
    }

    /// Add a cart row; duplicates fail on the unique constraint
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate pair or database failure
    pub async fn add_to_cart(&self, user_id: Uuid, recipe_id: i64) -> Result<()> {
        self.add_user_recipe(UserRecipeRelation::Cart, user_id, recipe_id)
            .await
    }

    /// Remove a cart row; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn remove_from_cart(&self, user_id: Uuid, recipe_id: i64) -> Result<bool> {
        self.remove_user_recipe(UserRecipeRelation::Cart, user_id, recipe_id)
            .await
    }

    /// Whether the recipe is in the user's cart
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_in_cart(&self, user_id: Uuid, recipe_id: i64) -> Result<bool> {
        self.has_user_recipe(UserRecipeRelation::Cart, user_id, recipe_id)
            .await
    }

    /// Number of recipes currently in the user's cart
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn cart_size(&self, user_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM shopping_cart WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Number of users who favorited the recipe (admin console)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn favorite_count(&self, recipe_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM favorites WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Aggregate the user's cart: sum amount grouped by (name, unit), one
    /// consolidated line per distinct ingredient+unit pair
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn shopping_list(&self, user_id: Uuid) -> Result<Vec<ShoppingListEntry>> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount
            FROM shopping_cart c
            JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE c.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ShoppingListEntry {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                total_amount: row.get("total_amount"),
            })
            .collect())
    }

    /// Search recipes by name substring (admin console)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn search_recipes(&self, term: &str) -> Result<Vec<Recipe>> {
        let pattern = format!("%{}%", super::users::escape_like(term));
        let rows = sqlx::query(
            "SELECT id, author_id, name, image, text, cooking_time, pub_date
             FROM recipes WHERE name LIKE $1 ESCAPE '\\' COLLATE NOCASE
             ORDER BY pub_date DESC",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_recipe).collect()
    }

    async fn add_user_recipe(
        &self,
        relation: UserRecipeRelation,
        user_id: Uuid,
        recipe_id: i64,
    ) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2)",
            relation.table()
        );
        sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_user_recipe(
        &self,
        relation: UserRecipeRelation,
        user_id: Uuid,
        recipe_id: i64,
    ) -> Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            relation.table()
        );
        let result = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn has_user_recipe(
        &self,
        relation: UserRecipeRelation,
        user_id: Uuid,
        recipe_id: i64,
    ) -> Result<bool> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM {} WHERE user_id = $1 AND recipe_id = $2",
            relation.table()
        );
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(recipe_id)
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.get("n");
        Ok(n > 0)
    }
}

fn row_to_recipe(row: &sqlx::sqlite::SqliteRow) -> Result<Recipe> {
    let author_id: String = row.get("author_id");
    let pub_date: DateTime<Utc> = row.get("pub_date");

    Ok(Recipe {
        id: row.get("id"),
        author_id: Uuid::parse_str(&author_id)?,
        name: row.get("name"),
        image: row.get("image"),
        text: row.get("text"),
        cooking_time: row.get::<i64, _>("cooking_time") as u32,
        pub_date,
    })
}
