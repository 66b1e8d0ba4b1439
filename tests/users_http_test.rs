// ABOUTME: HTTP integration tests for registration, login, profiles, password change
// ABOUTME: Covers collected validation errors, duplicate conflicts, and pagination

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! User account endpoint tests

mod common;
mod helpers;

use helpers::axum_test::AxumTestRequest;

#[tokio::test]
async fn test_registration_returns_profile_without_password() {
    let (app, _resources) = common::create_test_app().await;

    let profile = common::register(&app, "alice@example.com", "alice").await;

    assert_eq!(profile["email"], "alice@example.com");
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["is_subscribed"], false);
    assert!(profile.get("password").is_none());
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn test_registration_collects_all_field_errors() {
    let (app, _resources) = common::create_test_app().await;

    let response = AxumTestRequest::post("/api/users")
        .json(&serde_json::json!({
            "email": "not-an-email",
            "username": "bad name!",
            "first_name": "",
            "last_name": "",
            "password": "short",
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json();
    let errors = body["error"]["details"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 5, "every violation should be reported: {errors:?}");
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let (app, _resources) = common::create_test_app().await;

    common::register(&app, "bob@example.com", "bob").await;

    let response = AxumTestRequest::post("/api/users")
        .json(&serde_json::json!({
            "email": "bob@example.com",
            "username": "bob2",
            "first_name": "Bob",
            "last_name": "Builder",
            "password": common::TEST_PASSWORD,
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _resources) = common::create_test_app().await;
    common::register(&app, "carol@example.com", "carol").await;

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "carol@example.com",
            "password": "WrongPassword1",
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_login_rejects_unknown_email_identically() {
    let (app, _resources) = common::create_test_app().await;

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "ghost@example.com",
            "password": common::TEST_PASSWORD,
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_me_requires_authentication() {
    let (app, _resources) = common::create_test_app().await;

    let response = AxumTestRequest::get("/api/users/me").send(app).await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_me_returns_own_profile() {
    let (app, _resources) = common::create_test_app().await;
    let (token, user_id) = common::register_and_login(&app, "dave@example.com", "dave").await;

    let response = AxumTestRequest::get("/api/users/me")
        .bearer(&token)
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["username"], "dave");
}

#[tokio::test]
async fn test_profile_visible_to_anonymous() {
    let (app, _resources) = common::create_test_app().await;
    let (_token, user_id) = common::register_and_login(&app, "erin@example.com", "erin").await;

    let response = AxumTestRequest::get(&format!("/api/users/{user_id}"))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["is_subscribed"], false);
}

#[tokio::test]
async fn test_set_password_rejects_wrong_current() {
    let (app, _resources) = common::create_test_app().await;
    let (token, _user_id) = common::register_and_login(&app, "frank@example.com", "frank").await;

    let response = AxumTestRequest::post("/api/users/set_password")
        .bearer(&token)
        .json(&serde_json::json!({
            "current_password": "NotTheRightOne1",
            "new_password": "NewPassword123",
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_set_password_then_login_with_new_one() {
    let (app, _resources) = common::create_test_app().await;
    let (token, _user_id) = common::register_and_login(&app, "grace@example.com", "grace").await;

    let response = AxumTestRequest::post("/api/users/set_password")
        .bearer(&token)
        .json(&serde_json::json!({
            "current_password": common::TEST_PASSWORD,
            "new_password": "NewPassword123",
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 204);

    // Old password no longer works
    let old = AxumTestRequest::post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "grace@example.com",
            "password": common::TEST_PASSWORD,
        }))
        .send(app.clone())
        .await;
    assert_eq!(old.status(), 401);

    let fresh = AxumTestRequest::post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "grace@example.com",
            "password": "NewPassword123",
        }))
        .send(app)
        .await;
    assert_eq!(fresh.status(), 200);
}

#[tokio::test]
async fn test_user_listing_paginates_with_limit_override() {
    let (app, _resources) = common::create_test_app().await;

    for i in 0..3 {
        common::register(&app, &format!("user{i}@example.com"), &format!("user{i}")).await;
    }

    let response = AxumTestRequest::get("/api/users?page=1&limit=2")
        .send(app.clone())
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert!(body["next"].as_str().unwrap().contains("page=2"));
    assert!(body["previous"].is_null());

    let last = AxumTestRequest::get("/api/users?page=2&limit=2").send(app).await;
    let body: serde_json::Value = last.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert!(body["next"].is_null());
    assert!(body["previous"].as_str().unwrap().contains("page=1"));
}

#[tokio::test]
async fn test_invalid_bearer_token_is_rejected() {
    let (app, _resources) = common::create_test_app().await;

    let response = AxumTestRequest::get("/api/users/me")
        .bearer("not-a-real-token")
        .send(app)
        .await;

    assert_eq!(response.status(), 401);
}
