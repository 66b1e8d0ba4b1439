// ABOUTME: Main library entry point for the Foodgram recipe-sharing backend
// ABOUTME: Provides the REST API, database layer, and authentication stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

#![deny(unsafe_code)]

//! # Foodgram Server
//!
//! A recipe-sharing REST backend. Users publish recipes with ingredients and
//! tags, favorite recipes, subscribe to other authors, and download an
//! aggregated shopping list built from the recipes in their cart.
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Models**: Domain entities (users, recipes, tags, ingredients)
//! - **Database**: `SQLite` storage via `sqlx` with per-domain modules
//! - **Auth**: JWT bearer tokens and bcrypt password hashing
//! - **Routes**: Thin axum handlers organized by domain
//! - **Config**: Environment-based server configuration

/// JWT-based authentication and password hashing
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// Application constants and domain limits
pub mod constants;

/// Database layer over `SQLite` with per-domain modules
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Request authentication extractors
pub mod middleware;

/// Common domain data models
pub mod models;

/// Page-number pagination for list endpoints
pub mod pagination;

/// HTTP route handlers organized by domain
pub mod routes;

/// Server assembly: shared resources, router, and serve loop
pub mod server;
