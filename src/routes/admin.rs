// ABOUTME: Administrative console routes for user, recipe and catalog oversight
// ABOUTME: Every handler requires the admin role via the AdminUser extractor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Admin console routes
//!
//! The console lists and searches users and recipes, promotes or demotes
//! users, and removes any recipe regardless of author. Recipe listings
//! carry the favorite count so moderators can see popularity.

use crate::errors::{AppError, AppResult};
use crate::middleware::AdminUser;
use crate::models::{Recipe, User, UserRole};
use crate::pagination::{Page, PageQuery};
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Console view of a user account
#[derive(Debug, Serialize)]
pub struct AdminUserEntry {
    /// User id
    pub id: String,
    /// Login email
    pub email: String,
    /// Public username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Account role
    pub role: String,
    /// Registration timestamp, RFC 3339
    pub created_at: String,
}

impl AdminUserEntry {
    fn project(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Console view of a recipe with its popularity
#[derive(Debug, Serialize)]
pub struct AdminRecipeEntry {
    /// Recipe id
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Author id
    pub author_id: String,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Publication timestamp, RFC 3339
    pub pub_date: String,
    /// How many users favorited this recipe
    pub favorite_count: i64,
}

/// Role change request
#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    /// New role, `user` or `admin`
    pub role: String,
}

/// Free-text search parameter shared by console listings
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Substring match, case-insensitive
    pub search: Option<String>,
    /// Page number
    pub page: Option<u32>,
    /// Page size override
    pub limit: Option<u32>,
}

/// Admin console routes
#[must_use]
pub fn router() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/users", get(handle_list_users))
        .route("/users/:id/role", axum::routing::patch(handle_set_role))
        .route("/recipes", get(handle_list_recipes))
        .route("/recipes/:id", axum::routing::delete(handle_delete_recipe))
        .route("/tags", get(handle_list_tags))
        .route("/ingredients", get(handle_list_ingredients))
}

async fn handle_list_users(
    State(state): State<Arc<ServerResources>>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(term) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let users = state.database.search_users(term).await?;
        let entries: Vec<AdminUserEntry> = users.iter().map(AdminUserEntry::project).collect();
        return Ok(Json(serde_json::json!({
            "count": entries.len(),
            "results": entries,
        })));
    }

    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let default_size = state.config.page_size;
    let limit = i64::from(page_query.page_size(default_size));
    let offset = page_query.offset(default_size);

    let users = state.database.list_users(limit, offset).await?;
    let count = state.database.count_users().await?;
    let entries: Vec<AdminUserEntry> = users.iter().map(AdminUserEntry::project).collect();

    Ok(Json(serde_json::json!(Page::new(
        "/admin/users",
        &[],
        page_query,
        default_size,
        count,
        entries
    ))))
}

async fn handle_set_role(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<RoleUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let role = match request.role.as_str() {
        "user" => UserRole::User,
        "admin" => UserRole::Admin,
        other => {
            return Err(AppError::invalid_input(format!("Unknown role: {other}")));
        }
    };

    // An admin stripping their own role would lock the console
    if user_id == admin.id && role != UserRole::Admin {
        return Err(AppError::invalid_input(
            "You cannot remove your own admin role",
        ));
    }

    let user = state
        .database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if !state.database.update_user_role(user.id, role).await? {
        return Err(AppError::not_found("User"));
    }
    info!(user_id = %user.id, role = role.as_str(), admin_id = %admin.id, "role updated");

    Ok(Json(serde_json::json!({
        "id": user.id.to_string(),
        "role": role.as_str(),
    })))
}

async fn recipe_entry(state: &ServerResources, recipe: &Recipe) -> AppResult<AdminRecipeEntry> {
    let favorite_count = state.database.favorite_count(recipe.id).await?;
    Ok(AdminRecipeEntry {
        id: recipe.id,
        name: recipe.name.clone(),
        author_id: recipe.author_id.to_string(),
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date.to_rfc3339(),
        favorite_count,
    })
}

async fn handle_list_recipes(
    State(state): State<Arc<ServerResources>>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(term) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let recipes = state.database.search_recipes(term).await?;
        let mut entries = Vec::with_capacity(recipes.len());
        for recipe in &recipes {
            entries.push(recipe_entry(&state, recipe).await?);
        }
        return Ok(Json(serde_json::json!({
            "count": entries.len(),
            "results": entries,
        })));
    }

    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let default_size = state.config.page_size;
    let limit = i64::from(page_query.page_size(default_size));
    let offset = page_query.offset(default_size);

    let filter = crate::database::RecipeFilter::default();
    let recipes = state.database.list_recipes(&filter, limit, offset).await?;
    let count = state.database.count_recipes(&filter).await?;

    let mut entries = Vec::with_capacity(recipes.len());
    for recipe in &recipes {
        entries.push(recipe_entry(&state, recipe).await?);
    }

    Ok(Json(serde_json::json!(Page::new(
        "/admin/recipes",
        &[],
        page_query,
        default_size,
        count,
        entries
    ))))
}

async fn handle_list_tags(
    State(state): State<Arc<ServerResources>>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let tags = match query.search.as_deref().filter(|s| !s.is_empty()) {
        Some(term) => state.database.search_tags(term).await?,
        None => state.database.list_tags().await?,
    };
    Ok(Json(serde_json::json!({
        "count": tags.len(),
        "results": tags,
    })))
}

async fn handle_list_ingredients(
    State(state): State<Arc<ServerResources>>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let ingredients = match query.search.as_deref().filter(|s| !s.is_empty()) {
        Some(term) => state.database.search_ingredients(term).await?,
        None => state.database.list_ingredients(None).await?,
    };
    Ok(Json(serde_json::json!({
        "count": ingredients.len(),
        "results": ingredients,
    })))
}

async fn handle_delete_recipe(
    State(state): State<Arc<ServerResources>>,
    AdminUser(admin): AdminUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.database.delete_recipe(recipe_id).await?;
    if !deleted {
        return Err(AppError::not_found("Recipe"));
    }
    info!(recipe_id, admin_id = %admin.id, "recipe removed by admin");
    Ok(StatusCode::NO_CONTENT)
}
