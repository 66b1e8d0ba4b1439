// ABOUTME: Route module organization for the Foodgram HTTP endpoints
// ABOUTME: Provides route definitions organized by domain with thin handler functions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Route modules
//!
//! Each domain module exposes a `router()` returning a
//! `Router<Arc<ServerResources>>`; the server nests them under the API root.
//! Handlers stay thin: parse, authorize, call the database layer, project
//! the response.

/// Administrative console routes (admin role required)
pub mod admin;
/// Login and token issuing
pub mod auth;
/// Tag and ingredient catalog routes
pub mod catalog;
/// Health check and readiness routes
pub mod health;
/// Recipe CRUD, favorites, cart, and shopping-list export
pub mod recipes;
/// User registration, profiles, password change, and subscriptions
pub mod users;
