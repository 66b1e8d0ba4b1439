// ABOUTME: Test helper module exports for integration tests
// ABOUTME: Provides Axum request helpers shared across test files

pub mod axum_test;
