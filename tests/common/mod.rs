// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and fixture creation helpers
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram_server`
//!
//! Common setup to reduce duplication across integration tests: an in-memory
//! database behind the full application router, plus registration, login,
//! and catalog seeding helpers.

use axum::Router;
use foodgram_server::auth::{generate_jwt_secret, AuthManager};
use foodgram_server::config::environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, LogLevel, ServerConfig,
};
use foodgram_server::database::Database;
use foodgram_server::models::UserRole;
use foodgram_server::server::{build_router, ServerResources};
use std::sync::{Arc, Once};
use uuid::Uuid;

use super::helpers::axum_test::AxumTestRequest;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Test configuration matching production defaults
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        auth: AuthConfig {
            jwt_secret: None,
            jwt_expiry_hours: 24,
        },
        page_size: 6,
        log_level: LogLevel::Warn,
    }
}

/// In-memory database plus auth manager behind shared server resources
pub async fn create_test_resources() -> Arc<ServerResources> {
    init_test_logging();
    let database = Database::new("sqlite::memory:")
        .await
        .expect("in-memory database");
    let auth_manager = AuthManager::new(generate_jwt_secret().to_vec(), 24);
    Arc::new(ServerResources::new(database, auth_manager, test_config()))
}

/// Full application router over fresh in-memory resources
pub async fn create_test_app() -> (Router, Arc<ServerResources>) {
    let resources = create_test_resources().await;
    (build_router(Arc::clone(&resources)), resources)
}

/// Password accepted by the registration validator
pub const TEST_PASSWORD: &str = "Password123";

/// Register a user; returns the created profile JSON
pub async fn register(app: &Router, email: &str, username: &str) -> serde_json::Value {
    let response = AxumTestRequest::post("/api/users")
        .json(&serde_json::json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "User",
            "password": TEST_PASSWORD,
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201, "registration should succeed");
    response.json()
}

/// Log in; returns the bearer token
pub async fn login(app: &Router, email: &str) -> String {
    let response = AxumTestRequest::post("/api/auth/login")
        .json(&serde_json::json!({
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200, "login should succeed");
    let body: serde_json::Value = response.json();
    body["auth_token"].as_str().expect("auth_token").to_owned()
}

/// Register and log in; returns (token, user id)
pub async fn register_and_login(app: &Router, email: &str, username: &str) -> (String, String) {
    let profile = register(app, email, username).await;
    let user_id = profile["id"].as_str().expect("user id").to_owned();
    let token = login(app, email).await;
    (token, user_id)
}

/// Grant the admin role directly through the database layer
pub async fn promote_to_admin(resources: &ServerResources, user_id: &str) {
    let id = Uuid::parse_str(user_id).expect("valid uuid");
    let updated = resources
        .database
        .update_user_role(id, UserRole::Admin)
        .await
        .expect("role update");
    assert!(updated, "user to promote should exist");
}

/// Seeded catalog fixture: tag ids and ingredient ids
pub struct CatalogFixture {
    pub breakfast_tag: i64,
    pub dinner_tag: i64,
    pub flour: i64,
    pub sugar: i64,
    pub milk: i64,
}

/// Seed a small tag and ingredient catalog directly through the database layer
pub async fn seed_catalog(resources: &ServerResources) -> CatalogFixture {
    let db = &resources.database;
    let breakfast = db
        .create_tag("Breakfast", "#E26C2D", "breakfast")
        .await
        .expect("tag");
    let dinner = db.create_tag("Dinner", "#49B64E", "dinner").await.expect("tag");
    let flour = db.create_ingredient("flour", "g").await.expect("ingredient");
    let sugar = db.create_ingredient("sugar", "g").await.expect("ingredient");
    let milk = db.create_ingredient("milk", "ml").await.expect("ingredient");

    CatalogFixture {
        breakfast_tag: breakfast.id,
        dinner_tag: dinner.id,
        flour: flour.id,
        sugar: sugar.id,
        milk: milk.id,
    }
}

/// Create a recipe over HTTP; returns the full recipe JSON
pub async fn create_recipe(
    app: &Router,
    token: &str,
    name: &str,
    ingredients: &[(i64, u32)],
    tags: &[i64],
    cooking_time: u32,
) -> serde_json::Value {
    let ingredient_refs: Vec<serde_json::Value> = ingredients
        .iter()
        .map(|(id, amount)| serde_json::json!({"id": id, "amount": amount}))
        .collect();

    let response = AxumTestRequest::post("/api/recipes")
        .bearer(token)
        .json(&serde_json::json!({
            "name": name,
            "text": "Mix everything and cook",
            "cooking_time": cooking_time,
            "image": null,
            "ingredients": ingredient_refs,
            "tags": tags,
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201, "recipe creation should succeed");
    response.json()
}
