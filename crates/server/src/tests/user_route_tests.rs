// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use super::helpers::{PASSWORD, TestApp, TestResponse, setup};

#[tokio::test]
async fn test_new_agents_start_pending_and_managers_start_approved() {
    let app: TestApp = setup().await;
    let agent: i64 = app.add_user("agent", "agent").await;
    let manager: i64 = app.add_user("manager", "affiliate_manager").await;

    let response: TestResponse = app.get("/users?role=agent", app.admin_id).await;
    assert_eq!(response.status, StatusCode::OK);
    let body: Value = response.json();
    let users: &Vec<Value> = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["user_id"], agent);
    assert_eq!(users[0]["status"], "pending");

    let response: TestResponse = app.get("/users?role=affiliate_manager", app.admin_id).await;
    let body: Value = response.json();
    assert_eq!(body["users"][0]["user_id"], manager);
    assert_eq!(body["users"][0]["status"], "approved");
}

#[tokio::test]
async fn test_user_responses_never_include_credentials() {
    let app: TestApp = setup().await;
    app.add_user("agent", "agent").await;

    let response: TestResponse = app.get("/users", app.admin_id).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("password"));
    assert!(!response.body.contains(PASSWORD));
}

#[tokio::test]
async fn test_only_admins_create_users() {
    let app: TestApp = setup().await;
    let manager: i64 = app.add_user("manager", "affiliate_manager").await;

    let response: TestResponse = app
        .send_json(
            Method::POST,
            "/users",
            manager,
            &json!({
                "login_name": "agent",
                "display_name": "Agent",
                "password": PASSWORD,
                "role": "agent",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_weak_password_is_rejected() {
    let app: TestApp = setup().await;

    let response: TestResponse = app
        .send_json(
            Method::POST,
            "/users",
            app.admin_id,
            &json!({
                "login_name": "agent",
                "display_name": "Agent",
                "password": "short",
                "role": "agent",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn test_duplicate_login_name_conflicts() {
    let app: TestApp = setup().await;
    app.add_user("agent", "agent").await;

    let response: TestResponse = app
        .send_json(
            Method::POST,
            "/users",
            app.admin_id,
            &json!({
                "login_name": "agent",
                "display_name": "Another agent",
                "password": PASSWORD,
                "role": "agent",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_updating_unknown_user_is_not_found() {
    let app: TestApp = setup().await;

    let response: TestResponse = app
        .send_json(
            Method::PATCH,
            "/users/9999",
            app.admin_id,
            &json!({ "status": "approved" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
