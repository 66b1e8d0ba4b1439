// ABOUTME: Tag and ingredient catalog routes: open reads, admin-only mutation
// ABOUTME: Ingredient listing supports case-insensitive name-prefix filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Catalog routes
//!
//! Tags and ingredients are read by anyone, unpaginated. Creating, editing
//! and deleting catalog entries requires the admin role. Tag colors are
//! validated as `#RRGGBB` hex.

use crate::constants::patterns;
use crate::errors::{AppError, AppResult};
use crate::middleware::AdminUser;
use crate::models::{Ingredient, Tag};
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Tag create/update payload
#[derive(Debug, Deserialize)]
pub struct TagPayload {
    /// Display name
    pub name: String,
    /// Hex color, `#RRGGBB`
    pub color: String,
    /// URL slug
    pub slug: String,
}

/// Ingredient create/update payload
#[derive(Debug, Deserialize)]
pub struct IngredientPayload {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
}

/// Ingredient listing filter
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

#[allow(clippy::unwrap_used)] // pattern is a checked constant
fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(patterns::HEX_COLOR).unwrap())
}

/// Catalog routes
#[must_use]
pub fn router() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/tags", get(handle_list_tags).post(handle_create_tag))
        .route(
            "/tags/:id",
            get(handle_get_tag)
                .patch(handle_update_tag)
                .delete(handle_delete_tag),
        )
        .route(
            "/ingredients",
            get(handle_list_ingredients).post(handle_create_ingredient),
        )
        .route(
            "/ingredients/:id",
            get(handle_get_ingredient)
                .patch(handle_update_ingredient)
                .delete(handle_delete_ingredient),
        )
}

fn validate_tag(payload: &TagPayload) -> Vec<String> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("Tag name must not be empty".to_owned());
    }
    if !hex_color_pattern().is_match(&payload.color) {
        errors.push("Color must be a hex value like #49B64E".to_owned());
    }
    if payload.slug.trim().is_empty()
        || !payload
            .slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.push("Slug must contain only letters, digits, hyphens and underscores".to_owned());
    }
    errors
}

fn validate_ingredient(payload: &IngredientPayload) -> Vec<String> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("Ingredient name must not be empty".to_owned());
    }
    if payload.measurement_unit.trim().is_empty() {
        errors.push("Measurement unit must not be empty".to_owned());
    }
    errors
}

async fn handle_list_tags(
    State(state): State<Arc<ServerResources>>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.database.list_tags().await?))
}

async fn handle_get_tag(
    State(state): State<Arc<ServerResources>>,
    Path(tag_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let tag = state
        .database
        .get_tag(tag_id)
        .await?
        .ok_or_else(|| AppError::not_found("Tag"))?;
    Ok(Json(tag))
}

async fn handle_create_tag(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<TagPayload>,
) -> AppResult<impl IntoResponse> {
    let errors = validate_tag(&payload);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let tag = state
        .database
        .create_tag(&payload.name, &payload.color, &payload.slug)
        .await?;
    info!(tag_id = tag.id, admin_id = %admin.id, "tag created");

    Ok((StatusCode::CREATED, Json(tag)))
}

async fn handle_update_tag(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Path(tag_id): Path<i64>,
    Json(payload): Json<TagPayload>,
) -> AppResult<impl IntoResponse> {
    let errors = validate_tag(&payload);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let tag = Tag {
        id: tag_id,
        name: payload.name,
        color: payload.color,
        slug: payload.slug,
    };
    if !state.database.update_tag(&tag).await? {
        return Err(AppError::not_found("Tag"));
    }
    info!(tag_id, admin_id = %admin.id, "tag updated");

    Ok(Json(tag))
}

async fn handle_delete_tag(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Path(tag_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.database.delete_tag(tag_id).await?;
    if !deleted {
        return Err(AppError::not_found("Tag"));
    }
    info!(tag_id, admin_id = %admin.id, "tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_list_ingredients(
    State(state): State<Arc<ServerResources>>,
    Query(query): Query<IngredientQuery>,
) -> AppResult<impl IntoResponse> {
    let prefix = query.name.as_deref().filter(|s| !s.is_empty());
    Ok(Json(state.database.list_ingredients(prefix).await?))
}

async fn handle_get_ingredient(
    State(state): State<Arc<ServerResources>>,
    Path(ingredient_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let ingredient = state
        .database
        .get_ingredient(ingredient_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ingredient"))?;
    Ok(Json(ingredient))
}

async fn handle_create_ingredient(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<IngredientPayload>,
) -> AppResult<impl IntoResponse> {
    let errors = validate_ingredient(&payload);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let ingredient = state
        .database
        .create_ingredient(&payload.name, &payload.measurement_unit)
        .await?;
    info!(ingredient_id = ingredient.id, admin_id = %admin.id, "ingredient created");

    Ok((StatusCode::CREATED, Json(ingredient)))
}

async fn handle_update_ingredient(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Path(ingredient_id): Path<i64>,
    Json(payload): Json<IngredientPayload>,
) -> AppResult<impl IntoResponse> {
    let errors = validate_ingredient(&payload);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let ingredient = Ingredient {
        id: ingredient_id,
        name: payload.name,
        measurement_unit: payload.measurement_unit,
    };
    if !state.database.update_ingredient(&ingredient).await? {
        return Err(AppError::not_found("Ingredient"));
    }
    info!(ingredient_id, admin_id = %admin.id, "ingredient updated");

    Ok(Json(ingredient))
}

async fn handle_delete_ingredient(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Path(ingredient_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.database.delete_ingredient(ingredient_id).await?;
    if !deleted {
        return Err(AppError::not_found("Ingredient"));
    }
    info!(ingredient_id, admin_id = %admin.id, "ingredient deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_validation_requires_hex_color() {
        let errors = validate_tag(&TagPayload {
            name: "Breakfast".into(),
            color: "green".into(),
            slug: "breakfast".into(),
        });
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("hex"));
    }

    #[test]
    fn tag_validation_accepts_well_formed_payload() {
        let errors = validate_tag(&TagPayload {
            name: "Dinner".into(),
            color: "#49B64E".into(),
            slug: "dinner_2".into(),
        });
        assert!(errors.is_empty());
    }

    #[test]
    fn tag_validation_rejects_bad_slug() {
        let errors = validate_tag(&TagPayload {
            name: "Lunch".into(),
            color: "#FFFFFF".into(),
            slug: "lunch time!".into(),
        });
        assert!(errors.iter().any(|e| e.contains("Slug")));
    }

    #[test]
    fn ingredient_validation_collects_both_fields() {
        let errors = validate_ingredient(&IngredientPayload {
            name: "  ".into(),
            measurement_unit: String::new(),
        });
        assert_eq!(errors.len(), 2);
    }
}
