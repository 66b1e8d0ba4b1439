// ABOUTME: Configuration module organization for the Foodgram server
// ABOUTME: Exposes environment-based server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Configuration management

/// Environment-based configuration for production deployment
pub mod environment;
