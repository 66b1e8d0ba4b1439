// ABOUTME: HTTP integration tests for the administrative console
// ABOUTME: Covers role gating, role changes, recipe oversight with favorite counts

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Admin console endpoint tests

mod common;
mod helpers;

use helpers::axum_test::AxumTestRequest;

#[tokio::test]
async fn test_console_requires_admin_role() {
    let (app, _resources) = common::create_test_app().await;
    let (token, _) = common::register_and_login(&app, "plain@example.com", "plain").await;

    let anonymous = AxumTestRequest::get("/admin/users").send(app.clone()).await;
    assert_eq!(anonymous.status(), 401);

    let forbidden = AxumTestRequest::get("/admin/users")
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(forbidden.status(), 403);
}

#[tokio::test]
async fn test_admin_lists_users() {
    let (app, resources) = common::create_test_app().await;
    let (admin_token, admin_id) =
        common::register_and_login(&app, "admin@example.com", "admin").await;
    common::promote_to_admin(&resources, &admin_id).await;
    common::register(&app, "other@example.com", "other").await;

    let response = AxumTestRequest::get("/admin/users")
        .bearer(&admin_token)
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 2);
    let roles: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["role"].as_str().unwrap())
        .collect();
    assert!(roles.contains(&"admin"));
    assert!(roles.contains(&"user"));
}

#[tokio::test]
async fn test_admin_searches_users() {
    let (app, resources) = common::create_test_app().await;
    let (admin_token, admin_id) =
        common::register_and_login(&app, "admin@example.com", "admin").await;
    common::promote_to_admin(&resources, &admin_id).await;
    common::register(&app, "findme@example.com", "findme").await;

    let response = AxumTestRequest::get("/admin/users?search=findme")
        .bearer(&admin_token)
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["username"], "findme");
}

#[tokio::test]
async fn test_admin_promotes_and_demotes() {
    let (app, resources) = common::create_test_app().await;
    let (admin_token, admin_id) =
        common::register_and_login(&app, "admin@example.com", "admin").await;
    common::promote_to_admin(&resources, &admin_id).await;
    let (other_token, other_id) =
        common::register_and_login(&app, "other@example.com", "other").await;

    let promoted = AxumTestRequest::patch(&format!("/admin/users/{other_id}/role"))
        .bearer(&admin_token)
        .json(&serde_json::json!({"role": "admin"}))
        .send(app.clone())
        .await;
    assert_eq!(promoted.status(), 200);

    // Role change takes effect on the next request
    let now_allowed = AxumTestRequest::get("/admin/users")
        .bearer(&other_token)
        .send(app.clone())
        .await;
    assert_eq!(now_allowed.status(), 200);

    let demoted = AxumTestRequest::patch(&format!("/admin/users/{other_id}/role"))
        .bearer(&admin_token)
        .json(&serde_json::json!({"role": "user"}))
        .send(app.clone())
        .await;
    assert_eq!(demoted.status(), 200);

    let forbidden_again = AxumTestRequest::get("/admin/users")
        .bearer(&other_token)
        .send(app)
        .await;
    assert_eq!(forbidden_again.status(), 403);
}

#[tokio::test]
async fn test_admin_cannot_strip_own_role() {
    let (app, resources) = common::create_test_app().await;
    let (admin_token, admin_id) =
        common::register_and_login(&app, "admin@example.com", "admin").await;
    common::promote_to_admin(&resources, &admin_id).await;

    let response = AxumTestRequest::patch(&format!("/admin/users/{admin_id}/role"))
        .bearer(&admin_token)
        .json(&serde_json::json!({"role": "user"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_unknown_role_rejected() {
    let (app, resources) = common::create_test_app().await;
    let (admin_token, admin_id) =
        common::register_and_login(&app, "admin@example.com", "admin").await;
    common::promote_to_admin(&resources, &admin_id).await;
    let (_other_token, other_id) =
        common::register_and_login(&app, "other@example.com", "other").await;

    let response = AxumTestRequest::patch(&format!("/admin/users/{other_id}/role"))
        .bearer(&admin_token)
        .json(&serde_json::json!({"role": "superuser"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_admin_recipe_listing_carries_favorite_counts() {
    let (app, resources) = common::create_test_app().await;
    let fixture = common::seed_catalog(&resources).await;
    let (admin_token, admin_id) =
        common::register_and_login(&app, "admin@example.com", "admin").await;
    common::promote_to_admin(&resources, &admin_id).await;
    let (chef_token, _) = common::register_and_login(&app, "chef@example.com", "chef").await;

    let recipe =
        common::create_recipe(&app, &chef_token, "Popular", &[(fixture.flour, 10)], &[], 10).await;
    let id = recipe["id"].as_i64().unwrap();

    AxumTestRequest::post(&format!("/api/recipes/{id}/favorite"))
        .bearer(&admin_token)
        .send(app.clone())
        .await;

    let response = AxumTestRequest::get("/admin/recipes")
        .bearer(&admin_token)
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["favorite_count"], 1);
}

#[tokio::test]
async fn test_admin_deletes_any_recipe() {
    let (app, resources) = common::create_test_app().await;
    let fixture = common::seed_catalog(&resources).await;
    let (admin_token, admin_id) =
        common::register_and_login(&app, "admin@example.com", "admin").await;
    common::promote_to_admin(&resources, &admin_id).await;
    let (chef_token, _) = common::register_and_login(&app, "chef@example.com", "chef").await;

    let recipe =
        common::create_recipe(&app, &chef_token, "Doomed", &[(fixture.flour, 10)], &[], 10).await;
    let id = recipe["id"].as_i64().unwrap();

    let deleted = AxumTestRequest::delete(&format!("/admin/recipes/{id}"))
        .bearer(&admin_token)
        .send(app.clone())
        .await;
    assert_eq!(deleted.status(), 204);

    let gone = AxumTestRequest::get(&format!("/api/recipes/{id}")).send(app).await;
    assert_eq!(gone.status(), 404);
}
