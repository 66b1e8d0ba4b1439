// ABOUTME: Recipe route handlers: CRUD, favorite/cart toggles, shopping-list download
// ABOUTME: Collects payload violations into one validation response; author-only mutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Recipe routes
//!
//! The write path validates the whole payload before touching the database:
//! ingredient list non-empty, amounts at least the minimum, no repeated
//! ingredient or tag ids, cooking time within bounds. All violations are
//! collected and reported together. Updates replace the tag set and all
//! ingredient lines wholesale.

use crate::constants::limits::{MAX_COOKING_TIME, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT};
use crate::database::RecipeFilter;
use crate::errors::{AppError, AppResult};
use crate::middleware::{CurrentUser, MaybeUser};
use crate::models::{Recipe, User};
use crate::pagination::{Page, PageQuery};
use crate::server::ServerResources;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use base64::Engine;
use http::{header, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::users::UserResponse;

/// One ingredient reference with its amount in a recipe payload
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientRef {
    /// Catalog ingredient id
    pub id: i64,
    /// Quantity
    pub amount: u32,
}

/// Recipe create/update payload
#[derive(Debug, Deserialize)]
pub struct RecipePayload {
    /// Recipe name
    pub name: String,
    /// Inline base64 image, optional
    pub image: Option<String>,
    /// Preparation text
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Ingredient references with amounts
    pub ingredients: Vec<IngredientRef>,
    /// Tag ids
    pub tags: Vec<i64>,
}

/// Ingredient line in a recipe response
#[derive(Debug, Serialize)]
pub struct IngredientLineResponse {
    /// Catalog ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Quantity
    pub amount: u32,
}

/// Full recipe representation
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    /// Recipe id
    pub id: i64,
    /// Attached tags
    pub tags: Vec<crate::models::Tag>,
    /// Recipe author with the caller's subscription flag
    pub author: UserResponse,
    /// Ingredient lines
    pub ingredients: Vec<IngredientLineResponse>,
    /// Whether the caller favorited this recipe
    pub is_favorited: bool,
    /// Whether this recipe is in the caller's cart
    pub is_in_shopping_cart: bool,
    /// Recipe name
    pub name: String,
    /// Inline base64 image
    pub image: Option<String>,
    /// Preparation text
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: u32,
}

/// Compact recipe projection for toggles and subscription listings
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeShort {
    /// Recipe id
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Inline base64 image
    pub image: Option<String>,
    /// Cooking time in minutes
    pub cooking_time: u32,
}

impl RecipeShort {
    pub(super) fn project(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Recipe listing query parameters (tags is repeatable)
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    /// Exact author match
    pub author: Option<Uuid>,
    /// Tag slugs, OR semantics
    #[serde(default)]
    pub tags: Vec<String>,
    /// Restrict to recipes the caller favorited
    pub is_favorited: Option<String>,
    /// Restrict to recipes in the caller's cart
    pub is_in_shopping_cart: Option<String>,
    /// Page number
    pub page: Option<u32>,
    /// Page size override
    pub limit: Option<u32>,
}

fn flag_is_set(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "True"))
}

/// Recipe routes
#[must_use]
pub fn router() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/recipes", get(handle_list).post(handle_create))
        .route(
            "/recipes/download_shopping_cart",
            get(handle_download_shopping_cart),
        )
        .route(
            "/recipes/:id",
            get(handle_get).patch(handle_update).delete(handle_delete),
        )
        .route(
            "/recipes/:id/favorite",
            axum::routing::post(handle_add_favorite).delete(handle_remove_favorite),
        )
        .route(
            "/recipes/:id/shopping_cart",
            axum::routing::post(handle_add_to_cart).delete(handle_remove_from_cart),
        )
}

/// Validate the whole payload, collecting every violation
fn validate_payload(payload: &RecipePayload) -> Vec<String> {
    let mut errors = Vec::new();

    if payload.ingredients.is_empty() {
        errors.push("Add at least one ingredient for the recipe".to_owned());
    }

    let mut seen_ingredients = HashSet::new();
    for ingredient in &payload.ingredients {
        if ingredient.amount < MIN_INGREDIENT_AMOUNT {
            errors.push(format!(
                "The amount of the ingredient with id {} must be at least {}",
                ingredient.id, MIN_INGREDIENT_AMOUNT
            ));
        }
        if !seen_ingredients.insert(ingredient.id) {
            errors.push("You cannot put the same ingredient in the recipe twice".to_owned());
        }
    }

    let mut seen_tags = HashSet::new();
    for tag in &payload.tags {
        if !seen_tags.insert(*tag) {
            errors.push("The same tag cannot be applied twice".to_owned());
        }
    }

    if payload.cooking_time < MIN_COOKING_TIME {
        errors.push(format!(
            "The cooking time should be at least {MIN_COOKING_TIME} minute"
        ));
    }
    if payload.cooking_time > MAX_COOKING_TIME {
        errors.push(format!(
            "The cooking time should not be longer than {MAX_COOKING_TIME} minutes"
        ));
    }

    if let Some(image) = &payload.image {
        if decode_image(image).is_none() {
            errors.push("The image must be valid base64 data".to_owned());
        }
    }

    errors
}

/// Accepts raw base64 or a `data:image/...;base64,` URL
fn decode_image(image: &str) -> Option<Vec<u8>> {
    let encoded = image.rsplit_once("base64,").map_or(image, |(_, rest)| rest);
    base64::engine::general_purpose::STANDARD.decode(encoded).ok()
}

/// Confirm every referenced ingredient and tag exists
async fn check_references(
    state: &ServerResources,
    payload: &RecipePayload,
) -> AppResult<()> {
    for ingredient in &payload.ingredients {
        if state.database.get_ingredient(ingredient.id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Ingredient with id {}",
                ingredient.id
            )));
        }
    }
    for tag_id in &payload.tags {
        if state.database.get_tag(*tag_id).await?.is_none() {
            return Err(AppError::not_found(format!("Tag with id {tag_id}")));
        }
    }
    Ok(())
}

/// Assemble the full representation for a viewer
async fn recipe_response(
    state: &ServerResources,
    recipe: &Recipe,
    viewer: Option<&User>,
) -> AppResult<RecipeResponse> {
    let tags = state.database.recipe_tags(recipe.id).await?;
    let lines = state.database.recipe_ingredient_lines(recipe.id).await?;
    let author = state
        .database
        .get_user(recipe.author_id)
        .await?
        .ok_or_else(|| AppError::internal("Recipe author missing"))?;

    let (is_favorited, is_in_shopping_cart, author_subscribed) = match viewer {
        Some(user) => (
            state.database.is_favorited(user.id, recipe.id).await?,
            state.database.is_in_cart(user.id, recipe.id).await?,
            state.database.is_subscribed(user.id, author.id).await?,
        ),
        None => (false, false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        tags,
        author: UserResponse::project(&author, author_subscribed),
        ingredients: lines
            .into_iter()
            .map(|line| IngredientLineResponse {
                id: line.ingredient_id,
                name: line.name,
                measurement_unit: line.measurement_unit,
                amount: line.amount,
            })
            .collect(),
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name.clone(),
        image: recipe.image.clone(),
        text: recipe.text.clone(),
        cooking_time: recipe.cooking_time,
    })
}

async fn handle_list(
    State(state): State<Arc<ServerResources>>,
    MaybeUser(viewer): MaybeUser,
    Query(query): Query<RecipeListQuery>,
) -> AppResult<impl IntoResponse> {
    let mut filter = RecipeFilter {
        author: query.author,
        tag_slugs: query.tags.clone(),
        ..RecipeFilter::default()
    };

    // Personalized filters are a no-op for anonymous callers
    if let Some(user) = &viewer {
        if flag_is_set(query.is_favorited.as_deref()) {
            filter.favorited_by = Some(user.id);
        }
        if flag_is_set(query.is_in_shopping_cart.as_deref()) {
            filter.in_cart_of = Some(user.id);
        }
    }

    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let default_size = state.config.page_size;
    let limit = i64::from(page_query.page_size(default_size));
    let offset = page_query.offset(default_size);

    let recipes = state.database.list_recipes(&filter, limit, offset).await?;
    let count = state.database.count_recipes(&filter).await?;

    let mut results = Vec::with_capacity(recipes.len());
    for recipe in &recipes {
        results.push(recipe_response(&state, recipe, viewer.as_ref()).await?);
    }

    // Filters are carried into the page links so `next` stays filtered
    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(author) = query.author {
        params.push(("author", author.to_string()));
    }
    for slug in &query.tags {
        params.push(("tags", slug.clone()));
    }
    if let Some(value) = &query.is_favorited {
        params.push(("is_favorited", value.clone()));
    }
    if let Some(value) = &query.is_in_shopping_cart {
        params.push(("is_in_shopping_cart", value.clone()));
    }

    Ok(Json(Page::new(
        "/api/recipes",
        &params,
        page_query,
        default_size,
        count,
        results,
    )))
}

async fn handle_create(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<RecipePayload>,
) -> AppResult<impl IntoResponse> {
    let errors = validate_payload(&payload);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }
    check_references(&state, &payload).await?;

    let lines: Vec<(i64, u32)> = payload
        .ingredients
        .iter()
        .map(|ingredient| (ingredient.id, ingredient.amount))
        .collect();

    let recipe_id = state
        .database
        .create_recipe(
            user.id,
            &payload.name,
            payload.image.as_deref(),
            &payload.text,
            payload.cooking_time,
            &payload.tags,
            &lines,
        )
        .await?;

    info!(recipe_id, author_id = %user.id, "recipe created");

    let recipe = state
        .database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::internal("Recipe vanished after creation"))?;
    let response = recipe_response(&state, &recipe, Some(&user)).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn handle_get(
    State(state): State<Arc<ServerResources>>,
    MaybeUser(viewer): MaybeUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let recipe = state
        .database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    Ok(Json(recipe_response(&state, &recipe, viewer.as_ref()).await?))
}

async fn handle_update(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
    Json(payload): Json<RecipePayload>,
) -> AppResult<impl IntoResponse> {
    let recipe = state
        .database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    if recipe.author_id != user.id {
        return Err(AppError::permission_denied(
            "Only the author may edit this recipe",
        ));
    }

    let errors = validate_payload(&payload);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }
    check_references(&state, &payload).await?;

    let lines: Vec<(i64, u32)> = payload
        .ingredients
        .iter()
        .map(|ingredient| (ingredient.id, ingredient.amount))
        .collect();

    // The recipe may be deleted between the ownership check and the write
    let updated = state
        .database
        .update_recipe(
            recipe_id,
            &payload.name,
            payload.image.as_deref(),
            &payload.text,
            payload.cooking_time,
            &payload.tags,
            &lines,
        )
        .await?;
    if !updated {
        return Err(AppError::not_found("Recipe"));
    }

    info!(recipe_id, author_id = %user.id, "recipe updated");

    let updated = state
        .database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::internal("Recipe vanished after update"))?;
    Ok(Json(recipe_response(&state, &updated, Some(&user)).await?))
}

async fn handle_delete(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let recipe = state
        .database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    if recipe.author_id != user.id {
        return Err(AppError::permission_denied(
            "Only the author may delete this recipe",
        ));
    }

    state.database.delete_recipe(recipe_id).await?;
    info!(recipe_id, author_id = %user.id, "recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_on(
    state: &ServerResources,
    user: &User,
    recipe_id: i64,
    add: impl std::future::Future<Output = anyhow::Result<()>>,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    let recipe = state
        .database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    // The unique constraint is the enforcement point for duplicates
    add.await.map_err(|e| AppError::from(e).with_user_id(user.id))?;

    Ok((StatusCode::CREATED, Json(RecipeShort::project(&recipe))))
}

async fn handle_add_favorite(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    toggle_on(
        &state,
        &user,
        recipe_id,
        state.database.add_favorite(user.id, recipe_id),
    )
    .await
}

async fn handle_remove_favorite(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let removed = state.database.remove_favorite(user.id, recipe_id).await?;
    if !removed {
        return Err(AppError::invalid_input("The recipe is not in favorites"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_add_to_cart(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    toggle_on(
        &state,
        &user,
        recipe_id,
        state.database.add_to_cart(user.id, recipe_id),
    )
    .await
}

async fn handle_remove_from_cart(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let removed = state.database.remove_from_cart(user.id, recipe_id).await?;
    if !removed {
        return Err(AppError::invalid_input(
            "The recipe is not in the shopping cart",
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_download_shopping_cart(
    State(state): State<Arc<ServerResources>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    if state.database.cart_size(user.id).await? == 0 {
        return Err(AppError::invalid_input("The shopping cart is empty"));
    }

    let entries = state.database.shopping_list(user.id).await?;
    let mut body = String::from("Shopping list:\n\n");
    for entry in &entries {
        body.push_str(&format!(
            "{} — {} {}\n",
            entry.name, entry.total_amount, entry.measurement_unit
        ));
    }

    info!(user_id = %user.id, lines = entries.len(), "shopping list downloaded");

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(ingredients: Vec<IngredientRef>, tags: Vec<i64>, cooking_time: u32) -> RecipePayload {
        RecipePayload {
            name: "Pancakes".into(),
            image: None,
            text: "Mix and fry".into(),
            cooking_time,
            ingredients,
            tags,
        }
    }

    #[test]
    fn empty_ingredients_rejected() {
        let errors = validate_payload(&payload(vec![], vec![1], 10));
        assert!(errors.iter().any(|e| e.contains("at least one ingredient")));
    }

    #[test]
    fn duplicate_ingredient_and_tag_collected_together() {
        let errors = validate_payload(&payload(
            vec![
                IngredientRef { id: 1, amount: 5 },
                IngredientRef { id: 1, amount: 3 },
            ],
            vec![2, 2],
            10,
        ));
        assert!(errors.iter().any(|e| e.contains("same ingredient")));
        assert!(errors.iter().any(|e| e.contains("same tag")));
    }

    #[test]
    fn cooking_time_bounds_inclusive() {
        let one = IngredientRef { id: 1, amount: 5 };
        assert!(validate_payload(&payload(vec![one.clone()], vec![], MIN_COOKING_TIME)).is_empty());
        assert!(validate_payload(&payload(vec![one.clone()], vec![], MAX_COOKING_TIME)).is_empty());
        assert!(!validate_payload(&payload(vec![one.clone()], vec![], MIN_COOKING_TIME - 1)).is_empty());
        assert!(!validate_payload(&payload(vec![one], vec![], MAX_COOKING_TIME + 1)).is_empty());
    }

    #[test]
    fn zero_amount_rejected() {
        let errors = validate_payload(&payload(vec![IngredientRef { id: 7, amount: 0 }], vec![], 10));
        assert!(errors.iter().any(|e| e.contains("id 7")));
    }

    #[test]
    fn image_decoding_accepts_data_urls() {
        assert!(decode_image("aGVsbG8=").is_some());
        assert!(decode_image("data:image/png;base64,aGVsbG8=").is_some());
        assert!(decode_image("!!not base64!!").is_none());
    }

    #[test]
    fn filter_flags_parse_truthy_values() {
        assert!(flag_is_set(Some("1")));
        assert!(flag_is_set(Some("true")));
        assert!(!flag_is_set(Some("0")));
        assert!(!flag_is_set(None));
    }
}
