// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Environment-based configuration management for production deployment

use crate::constants::{env_config, limits, pagination};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Default level
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Full tracing output
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file path
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests and throwaway setups)
    Memory,
}

impl DatabaseUrl {
    /// Parse a database URL string
    #[must_use]
    pub fn parse(url: &str) -> Self {
        if url == "sqlite::memory:" {
            Self::Memory
        } else {
            let path = url.strip_prefix("sqlite:").unwrap_or(url);
            Self::SQLite {
                path: PathBuf::from(path),
            }
        }
    }

    /// Render as an sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::Memory => "sqlite::memory:".into(),
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign JWT bearer tokens
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Parsed database URL
    pub url: DatabaseUrl,
}

/// Top-level server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Default page size for paginated listings
    pub page_size: u32,
    /// Log level
    pub log_level: LogLevel,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unparseable
    pub fn from_env() -> Result<Self> {
        let http_port = env_config::http_port();

        let database_url = DatabaseUrl::parse(&env_config::database_url());

        let jwt_secret = env::var("JWT_SECRET").ok();
        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(raw) => raw
                .parse::<i64>()
                .context("JWT_EXPIRY_HOURS must be an integer")?,
            Err(_) => limits::DEFAULT_JWT_EXPIRY_HOURS,
        };

        let page_size = match env::var("PAGE_SIZE") {
            Ok(raw) => raw.parse::<u32>().context("PAGE_SIZE must be an integer")?,
            Err(_) => pagination::DEFAULT_PAGE_SIZE,
        };

        let log_level = LogLevel::from_str_or_default(
            &env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        );

        Ok(Self {
            http_port,
            database: DatabaseConfig { url: database_url },
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours,
            },
            page_size,
            log_level,
        })
    }

    /// One-line summary of the effective configuration for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} database={} jwt_expiry_hours={} page_size={} log_level={}",
            self.http_port,
            self.database.url.to_connection_string(),
            self.auth.jwt_expiry_hours,
            self.page_size,
            self.log_level
        )
    }
}
