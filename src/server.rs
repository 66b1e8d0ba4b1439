// ABOUTME: HTTP server composition: shared resources, router assembly, serving
// ABOUTME: Nests domain routers under /api, the console under /admin, health at root
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Server assembly
//!
//! [`ServerResources`] bundles the database pool, the token manager and the
//! resolved configuration behind one `Arc` that every handler receives as
//! axum state. [`serve`] binds the listener and runs until SIGINT.

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::routes;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Request body cap, generous enough for base64-inlined recipe images
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state handed to every handler
pub struct ServerResources {
    /// Database access layer
    pub database: Database,
    /// JWT issuing and validation
    pub auth_manager: AuthManager,
    /// Resolved configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle the shared state
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        Self {
            database,
            auth_manager,
            config,
        }
    }
}

/// Assemble the full application router
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let api = Router::new()
        .merge(routes::auth::router())
        .merge(routes::users::router())
        .merge(routes::recipes::router())
        .merge(routes::catalog::router());

    Router::new()
        .nest("/api", api)
        .nest("/admin", routes::admin::router())
        .merge(routes::health::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(resources)
}

/// Bind the port and serve until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let port = resources.config.http_port;
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!(port, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
