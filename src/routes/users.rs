// ABOUTME: User route handlers: registration, profiles, password change, subscriptions
// ABOUTME: Computes per-caller is_subscribed projections and author recipe summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! User and subscription routes
//!
//! Registration collects every field violation into one validation response.
//! Subscription listing returns, per followed author, the profile, a page of
//! that author's recipes (optionally capped by `recipes_limit`), and the
//! author's total recipe count.

use crate::auth::{hash_password, is_valid_email, is_valid_password, verify_password};
use crate::constants::{error_messages, limits, patterns};
use crate::errors::{AppError, AppResult};
use crate::middleware::{CurrentUser, MaybeUser};
use crate::models::User;
use crate::pagination::{Page, PageQuery};
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::info;
use uuid::Uuid;

use super::recipes::RecipeShort;

/// User profile response with the per-caller subscription flag
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
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
    /// Whether the caller subscribes to this user
    pub is_subscribed: bool,
}

impl UserResponse {
    /// Build the projection for a viewer (anonymous viewers are never subscribed)
    pub(super) fn project(user: &User, is_subscribed: bool) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Public username, pattern-restricted
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Plaintext password
    pub password: String,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// Currently stored password, re-verified before the change
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
}

/// Subscription listing entry: author profile plus recipe summary
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    /// Author id
    pub id: String,
    /// Author email
    pub email: String,
    /// Author username
    pub username: String,
    /// Author given name
    pub first_name: String,
    /// Author family name
    pub last_name: String,
    /// Always true in this listing
    pub is_subscribed: bool,
    /// A page of the author's recipes
    pub recipes: Vec<RecipeShort>,
    /// Total recipe count for the author
    pub recipes_count: i64,
}

/// Cap on the recipes embedded per author in subscription responses
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecipesLimitQuery {
    /// Maximum number of recipes to embed
    pub recipes_limit: Option<i64>,
    /// Page number (subscription listing)
    pub page: Option<u32>,
    /// Page size override (subscription listing)
    pub limit: Option<u32>,
}

#[allow(clippy::unwrap_used)] // pattern is a checked constant
fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(patterns::USERNAME).unwrap())
}

/// User and subscription routes
#[must_use]
pub fn router() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/users", get(handle_list_users).post(handle_register))
        .route("/users/me", get(handle_me))
        .route("/users/set_password", post(handle_set_password))
        .route("/users/subscriptions", get(handle_subscriptions))
        .route("/users/:id", get(handle_get_user))
        .route(
            "/users/:id/subscribe",
            post(handle_subscribe).delete(handle_unsubscribe),
        )
}

fn validate_registration(request: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_valid_email(&request.email) || request.email.len() > limits::MAX_EMAIL_LENGTH {
        errors.push(error_messages::INVALID_EMAIL_FORMAT.to_owned());
    }
    if request.username.is_empty()
        || request.username.len() > limits::MAX_NAME_LENGTH
        || !username_pattern().is_match(&request.username)
    {
        errors.push(error_messages::INVALID_USERNAME.to_owned());
    }
    if request.first_name.is_empty() || request.first_name.len() > limits::MAX_NAME_LENGTH {
        errors.push("First name must be between 1 and 150 characters".to_owned());
    }
    if request.last_name.is_empty() || request.last_name.len() > limits::MAX_NAME_LENGTH {
        errors.push("Last name must be between 1 and 150 characters".to_owned());
    }
    if !is_valid_password(&request.password) {
        errors.push(error_messages::PASSWORD_TOO_WEAK.to_owned());
    }

    errors
}

async fn handle_register(
    State(state): State<Arc<ServerResources>>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let errors = validate_registration(&request);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let password_hash =
        hash_password(&request.password).map_err(|e| AppError::internal(e.to_string()))?;
    let user = User::new(
        request.email,
        request.username,
        request.first_name,
        request.last_name,
        password_hash,
    );

    state.database.create_user(&user).await.map_err(|e| {
        let app_error = AppError::from(e);
        if app_error.code == crate::errors::ErrorCode::ResourceAlreadyExists {
            AppError::conflict("A user with this email or username already exists")
        } else {
            app_error
        }
    })?;

    info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::project(&user, false)),
    ))
}

async fn handle_list_users(
    State(state): State<Arc<ServerResources>>,
    MaybeUser(viewer): MaybeUser,
    Query(page_query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let default_size = state.config.page_size;
    let limit = i64::from(page_query.page_size(default_size));
    let offset = page_query.offset(default_size);

    let users = state.database.list_users(limit, offset).await?;
    let count = state.database.count_users().await?;

    let mut results = Vec::with_capacity(users.len());
    for user in &users {
        let is_subscribed = match &viewer {
            Some(v) => state.database.is_subscribed(v.id, user.id).await?,
            None => false,
        };
        results.push(UserResponse::project(user, is_subscribed));
    }

    Ok(Json(Page::new(
        "/api/users",
        &[],
        page_query,
        default_size,
        count,
        results,
    )))
}

async fn handle_me(CurrentUser(user): CurrentUser) -> AppResult<impl IntoResponse> {
    // A user never subscribes to themselves
    Ok(Json(UserResponse::project(&user, false)))
}

async fn handle_get_user(
    State(state): State<Arc<ServerResources>>,
    MaybeUser(viewer): MaybeUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let is_subscribed = match &viewer {
        Some(v) => state.database.is_subscribed(v.id, user.id).await?,
        None => false,
    };

    Ok(Json(UserResponse::project(&user, is_subscribed)))
}

async fn handle_set_password(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<SetPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let current_ok = verify_password(&request.current_password, &user.password_hash)
        .map_err(|e| AppError::internal(e.to_string()))?;

    // One generic failure for a bad current password or a weak new one
    if !current_ok || !is_valid_password(&request.new_password) {
        return Err(AppError::invalid_input("Enter the correct data"));
    }

    let new_hash =
        hash_password(&request.new_password).map_err(|e| AppError::internal(e.to_string()))?;
    let updated = state.database.update_password(user.id, &new_hash).await?;
    if !updated {
        return Err(AppError::not_found("User"));
    }

    info!(user_id = %user.id, "password changed");

    Ok(StatusCode::NO_CONTENT)
}

async fn author_entry(
    state: &ServerResources,
    author: &User,
    recipes_limit: Option<i64>,
) -> AppResult<SubscriptionResponse> {
    let recipes = state
        .database
        .recipes_by_author(author.id, recipes_limit)
        .await?;
    let recipes_count = state.database.author_recipe_count(author.id).await?;

    Ok(SubscriptionResponse {
        id: author.id.to_string(),
        email: author.email.clone(),
        username: author.username.clone(),
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        is_subscribed: true,
        recipes: recipes.iter().map(RecipeShort::project).collect(),
        recipes_count,
    })
}

async fn handle_subscribe(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<Uuid>,
    Query(query): Query<RecipesLimitQuery>,
) -> AppResult<impl IntoResponse> {
    let author = state
        .database
        .get_user(author_id)
        .await?
        .ok_or_else(|| AppError::not_found("Author"))?;

    // Self-subscription and re-subscription are reported together
    let mut errors = Vec::new();
    if user.id == author.id {
        errors.push("You cannot subscribe to yourself".to_owned());
    }
    if state.database.is_subscribed(user.id, author.id).await? {
        errors.push("You are already subscribed to this author".to_owned());
    }
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    state.database.subscribe(user.id, author.id).await?;
    info!(user_id = %user.id, author_id = %author.id, "subscription created");

    let entry = author_entry(&state, &author, query.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn handle_unsubscribe(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let author = state
        .database
        .get_user(author_id)
        .await?
        .ok_or_else(|| AppError::not_found("Author"))?;

    let removed = state.database.unsubscribe(user.id, author.id).await?;
    if !removed {
        return Err(AppError::invalid_input(
            "You are not subscribed to this author",
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn handle_subscriptions(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<RecipesLimitQuery>,
) -> AppResult<impl IntoResponse> {
    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let default_size = state.config.page_size;
    let limit = i64::from(page_query.page_size(default_size));
    let offset = page_query.offset(default_size);

    let authors = state
        .database
        .list_subscribed_authors(user.id, limit, offset)
        .await?;
    let count = state.database.count_subscriptions(user.id).await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in &authors {
        results.push(author_entry(&state, author, query.recipes_limit).await?);
    }

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(cap) = query.recipes_limit {
        params.push(("recipes_limit", cap.to_string()));
    }

    Ok(Json(Page::new(
        "/api/users/subscriptions",
        &params,
        page_query,
        default_size,
        count,
        results,
    )))
}
