// ABOUTME: JWT-based user authentication and password hashing
// ABOUTME: Handles token generation, validation, bcrypt hashing, and password strength rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! # Authentication
//!
//! This module provides JWT bearer-token authentication and bcrypt password
//! hashing for the Foodgram server. Tokens carry the user id and email; the
//! role is always re-read from the database on each request so a role change
//! takes effect without re-login.

use crate::constants::limits::{DEFAULT_JWT_EXPIRY_HOURS, MIN_PASSWORD_LENGTH};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper JWT format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => {
                write!(
                    f,
                    "JWT token expired at {}",
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Generate a random JWT secret for development and test setups
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

/// Authentication manager: token issuing, validation, and password hashing
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub fn new(jwt_secret: Vec<u8>, expiry_hours: i64) -> Self {
        let expiry_hours = if expiry_hours > 0 {
            expiry_hours
        } else {
            DEFAULT_JWT_EXPIRY_HOURS
        };
        Self {
            jwt_secret,
            expiry_hours,
        }
    }

    /// Generate a bearer token for the given user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user_id: Uuid, email: &str) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiry_hours);
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )
        .context("failed to encode JWT")?;

        Ok((token, expires_at))
    }

    /// Validate a bearer token and return its claims
    ///
    /// # Errors
    ///
    /// Returns [`JwtValidationError`] describing expiry, bad signature, or
    /// a malformed token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation,
        ) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    // Decode without expiry validation to report when it expired
                    let mut lenient = Validation::new(Algorithm::HS256);
                    lenient.validate_exp = false;
                    let expired_at = decode::<Claims>(
                        token,
                        &DecodingKey::from_secret(&self.jwt_secret),
                        &lenient,
                    )
                    .ok()
                    .and_then(|data| DateTime::from_timestamp(data.claims.exp, 0))
                    .unwrap_or_else(Utc::now);
                    Err(JwtValidationError::TokenExpired { expired_at })
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    Err(JwtValidationError::TokenInvalid {
                        reason: "signature mismatch".into(),
                    })
                }
                _ => Err(JwtValidationError::TokenMalformed {
                    details: e.to_string(),
                }),
            },
        }
    }

    /// Extract the user id from validated claims
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a valid UUID
    pub fn user_id_from_claims(claims: &Claims) -> Result<Uuid> {
        Uuid::parse_str(&claims.sub).context("JWT subject is not a valid user id")
    }
}

/// Hash a password with bcrypt at the default cost
///
/// # Errors
///
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("failed to hash password")
}

/// Verify a password against a stored bcrypt hash
///
/// # Errors
///
/// Returns an error if the hash is malformed
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    bcrypt::verify(password, password_hash).context("failed to verify password")
}

/// Standard password strength validation: minimum length, at least one
/// letter and one digit
#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
        && password.chars().any(char::is_alphabetic)
        && password.chars().any(char::is_numeric)
}

/// Minimal structural email check (one `@`, non-empty local and domain parts)
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        _ => false,
    }
}
