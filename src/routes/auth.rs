// ABOUTME: Login route handler issuing JWT bearer tokens
// ABOUTME: Verifies email/password credentials against stored bcrypt hashes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Authentication routes
//!
//! Email is the login identifier. A successful login returns a bearer token
//! plus its expiry; credential failures are reported uniformly so the
//! response does not reveal whether the email exists.

use crate::auth::verify_password;
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// User info for login response
#[derive(Debug, Serialize)]
pub struct LoginUserInfo {
    /// User id
    pub id: String,
    /// Login email
    pub email: String,
    /// Public username
    pub username: String,
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub auth_token: String,
    /// Token expiry as RFC 3339
    pub expires_at: String,
    /// The authenticated user
    pub user: LoginUserInfo,
}

/// Authentication routes
#[must_use]
pub fn router() -> Router<Arc<ServerResources>> {
    Router::new().route("/auth/login", post(handle_login))
}

async fn handle_login(
    State(state): State<Arc<ServerResources>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .database
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

    let valid = verify_password(&request.password, &user.password_hash)
        .map_err(|e| AppError::internal(e.to_string()))?;
    if !valid {
        return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
    }

    let (token, expires_at) = state
        .auth_manager
        .generate_token(user.id, &user.email)
        .map_err(|e| AppError::internal(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        auth_token: token,
        expires_at: expires_at.to_rfc3339(),
        user: LoginUserInfo {
            id: user.id.to_string(),
            email: user.email,
            username: user.username,
        },
    }))
}
