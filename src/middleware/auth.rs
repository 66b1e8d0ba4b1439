// ABOUTME: Request authentication extractors for bearer-token JWT auth
// ABOUTME: Resolves the Authorization header to a database user with role checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Bearer-token authentication extractors
//!
//! Three flavors cover the authorization rules:
//! - [`CurrentUser`]: authentication required (personalized and mutating
//!   endpoints)
//! - [`MaybeUser`]: anonymous allowed; personalized projections degrade to
//!   their defaults
//! - [`AdminUser`]: authentication plus the admin role (catalog mutation,
//!   admin console)
//!
//! The user row is re-read from the database on every request, so role
//! changes and deletions take effect immediately.

use crate::auth::{AuthManager, JwtValidationError};
use crate::errors::AppError;
use crate::models::User;
use crate::server::ServerResources;
use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;
use std::sync::Arc;

/// An authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// An optionally authenticated caller
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// An authenticated caller holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn authenticate(token: &str, state: &Arc<ServerResources>) -> Result<User, AppError> {
    let claims = state.auth_manager.validate_token(token).map_err(|e| match e {
        JwtValidationError::TokenExpired { .. } => AppError::auth_expired(),
        JwtValidationError::TokenInvalid { reason } => AppError::auth_invalid(reason),
        JwtValidationError::TokenMalformed { details } => AppError::auth_invalid(details),
    })?;

    let user_id = AuthManager::user_id_from_claims(&claims)
        .map_err(|e| AppError::auth_invalid(e.to_string()))?;

    let user = state
        .database
        .get_user(user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "user lookup failed during authentication");
            AppError::database(e.to_string())
        })?
        .ok_or_else(|| AppError::auth_invalid("Token refers to an unknown user"))?;

    Ok(user)
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(AppError::auth_required)?;
        let user = authenticate(token, state).await?;
        Ok(Self(user))
    }
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            // A presented-but-invalid token is still an error; only the
            // absence of credentials is anonymous
            Some(token) => Ok(Self(Some(authenticate(token, state).await?))),
            None => Ok(Self(None)),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(AppError::auth_required)?;
        let user = authenticate(token, state).await?;
        if !user.is_admin() {
            return Err(AppError::permission_denied("Admin role required"));
        }
        Ok(Self(user))
    }
}
