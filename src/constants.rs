// ABOUTME: System-wide constants and domain limits for the Foodgram API
// ABOUTME: Contains recipe validation bounds, pagination defaults, and auth settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! # Constants Module
//!
//! Application constants and environment-based configuration defaults.

/// Domain validation limits
pub mod limits {
    /// Minimum accepted cooking time in minutes (inclusive)
    pub const MIN_COOKING_TIME: u32 = 1;

    /// Maximum accepted cooking time in minutes (inclusive)
    pub const MAX_COOKING_TIME: u32 = 1440;

    /// Minimum amount for a single ingredient line
    pub const MIN_INGREDIENT_AMOUNT: u32 = 1;

    /// Minimum accepted password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Maximum length for user names and name fields
    pub const MAX_NAME_LENGTH: usize = 150;

    /// Maximum length for an email address
    pub const MAX_EMAIL_LENGTH: usize = 254;

    /// JWT expiry in hours when not configured
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
}

/// Pagination defaults
pub mod pagination {
    /// Recipes (and other lists) shown per page when `limit` is absent
    pub const DEFAULT_PAGE_SIZE: u32 = 6;

    /// Hard cap on caller-supplied page sizes
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Regular expression patterns used for field validation
pub mod patterns {
    /// Allowed username characters (word chars plus `.@+-`)
    pub const USERNAME: &str = r"^[\w.@+-]+$";

    /// Tag color as a `#RRGGBB` hex string
    pub const HEX_COLOR: &str = r"^#[0-9a-fA-F]{6}$";
}

/// Network defaults
pub mod ports {
    /// Default HTTP port for the API server
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
}

/// Environment-based configuration defaults
pub mod env_config {
    use std::env;

    /// Get HTTP server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .unwrap_or_else(|_| super::ports::DEFAULT_HTTP_PORT.to_string())
            .parse()
            .unwrap_or(super::ports::DEFAULT_HTTP_PORT)
    }

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/foodgram.db".into())
    }
}

/// User-facing error messages shared across handlers
pub mod error_messages {
    /// Registration or login with a malformed email
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";

    /// Password rejected by strength validation
    pub const PASSWORD_TOO_WEAK: &str =
        "Password must be at least 8 characters and contain a letter and a digit";

    /// Username rejected by the pattern check
    pub const INVALID_USERNAME: &str =
        "Username may only contain letters, digits and the characters . @ + - _";

    /// Credentials did not match a known user
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
}
