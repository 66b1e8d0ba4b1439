// ABOUTME: HTTP middleware module organization
// ABOUTME: Exposes request authentication extractors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Request middleware

/// Bearer-token authentication extractors
pub mod auth;

pub use auth::{AdminUser, CurrentUser, MaybeUser};
