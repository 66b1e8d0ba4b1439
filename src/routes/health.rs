// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Readiness probes the database with a trivial query before answering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Health check routes
//!
//! `/health` answers unconditionally for liveness probes. `/ready` runs a
//! trivial query against the database so load balancers only route traffic
//! once storage is reachable.

use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Health check routes
#[must_use]
pub fn router() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn handle_ready(
    State(state): State<Arc<ServerResources>>,
) -> AppResult<Json<serde_json::Value>> {
    sqlx::query("SELECT 1")
        .fetch_one(state.database.pool())
        .await
        .map_err(|e| AppError::database(format!("Database not reachable: {e}")))?;

    Ok(Json(serde_json::json!({
        "status": "ready",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
