// ABOUTME: Common domain data models for the Foodgram recipe-sharing backend
// ABOUTME: Defines users, tags, ingredients, recipes, and ingredient lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! # Data Models
//!
//! Domain entities shared between the database layer and the route handlers.
//! Per-caller projections (`is_favorited`, `is_subscribed`) are deliberately
//! absent here: they are request-scoped and computed by the handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role for the permission system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user: owns recipes, favorites, cart, and subscriptions
    User,
    /// Administrator: may also mutate the tag/ingredient catalog
    Admin,
}

impl UserRole {
    /// Database representation of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its database representation
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// A registered user; email is the login identifier
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address (unique, used for login)
    pub email: String,
    /// Public username (unique, pattern-restricted)
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Hashed password for authentication
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role for the permission system
    pub role: UserRole,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user with the given profile and password hash
    #[must_use]
    pub fn new(
        email: String,
        username: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            first_name,
            last_name,
            password_hash,
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    /// Whether this user may mutate the tag/ingredient catalog
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A recipe tag (unique name, hex color, and slug)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique tag identifier
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Unique color as a `#RRGGBB` hex string
    pub color: String,
    /// Unique URL slug
    pub slug: String,
}

/// A catalog ingredient with its measurement unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique ingredient identifier
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit, e.g. "g" or "ml"
    pub measurement_unit: String,
}

/// A published recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier
    pub id: i64,
    /// Author of the recipe
    pub author_id: Uuid,
    /// Recipe name
    pub name: String,
    /// Inline base64 image, if any
    pub image: Option<String>,
    /// Preparation text
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Publication timestamp, set once at creation
    pub pub_date: DateTime<Utc>,
}

/// A (recipe, ingredient, amount) line item; unique per (recipe, ingredient)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Referenced catalog ingredient
    pub ingredient_id: i64,
    /// Ingredient name (denormalized for responses)
    pub name: String,
    /// Measurement unit (denormalized for responses)
    pub measurement_unit: String,
    /// Quantity of the ingredient
    pub amount: u32,
}

/// One consolidated shopping-list line: summed amount per (name, unit) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Total amount across all carted recipes
    pub total_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults_to_regular_role() {
        let user = User::new(
            "cook@example.com".into(),
            "cook".into(),
            "Julia".into(),
            "Child".into(),
            "hash".into(),
        );
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn role_round_trips_through_db_representation() {
        assert_eq!(UserRole::from_str_or_default("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_str_or_default("user"), UserRole::User);
        assert_eq!(UserRole::from_str_or_default("weird"), UserRole::User);
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }

    #[test]
    fn password_hash_never_serialized() {
        let user = User::new(
            "cook@example.com".into(),
            "cook".into(),
            "Julia".into(),
            "Child".into(),
            "secret-hash".into(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
