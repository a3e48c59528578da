// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::{Method, StatusCode, header};
use leadflow_domain::AllocationPolicy;
use serde_json::{Value, json};

use super::helpers::{TestApp, TestResponse, setup, setup_with_policy};

async fn create_order(app: &TestApp, requester: i64, body: &Value) -> TestResponse {
    app.send_json(Method::POST, "/orders", requester, body).await
}

#[tokio::test]
async fn test_create_order_fulfils_from_pool() {
    let app: TestApp = setup().await;
    app.import_leads("filler", 3).await;
    app.import_leads("ftd", 1).await;
    let manager: i64 = app.add_user("manager", "affiliate_manager").await;

    let response: TestResponse =
        create_order(&app, manager, &json!({ "filler": 2, "ftd": 1, "priority": "high" })).await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    let body: Value = response.json();
    assert_eq!(body["order"]["status"], "fulfilled");
    assert_eq!(body["order"]["priority"], "high");
    assert_eq!(body["order"]["requester_id"], manager);
    assert_eq!(body["order"]["lead_ids"].as_array().unwrap().len(), 3);
    assert!(body["event_id"].is_i64());
}

#[tokio::test]
async fn test_short_pool_gives_partial_order() {
    let app: TestApp = setup().await;
    app.import_leads("cold", 2).await;

    let response: TestResponse = create_order(&app, app.admin_id, &json!({ "cold": 5 })).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["order"]["status"], "partial");
    assert_eq!(body["order"]["fulfilled"]["cold"], 2);
    assert_eq!(body["order"]["requests"]["cold"], 5);
}

#[tokio::test]
async fn test_claimed_leads_are_not_offered_twice() {
    let app: TestApp = setup().await;
    app.import_leads("live", 2).await;

    let first: Value = create_order(&app, app.admin_id, &json!({ "live": 2 })).await.json();
    let second: Value = create_order(&app, app.admin_id, &json!({ "live": 1 })).await.json();

    assert_eq!(first["order"]["status"], "fulfilled");
    assert_eq!(second["order"]["status"], "partial");
    assert_eq!(second["order"]["fulfilled"]["live"], 0);
}

#[tokio::test]
async fn test_reclaim_policy_allows_assigned_leads() {
    let app: TestApp = setup_with_policy(AllocationPolicy {
        exclusive: false,
        require_agent_approval: true,
    })
    .await;
    app.import_leads("live", 1).await;

    create_order(&app, app.admin_id, &json!({ "live": 1 })).await;
    let second: Value = create_order(&app, app.admin_id, &json!({ "live": 1 })).await.json();

    assert_eq!(second["order"]["status"], "fulfilled");
}

#[tokio::test]
async fn test_empty_order_is_bad_request() {
    let app: TestApp = setup().await;

    let response: TestResponse = create_order(&app, app.admin_id, &json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], true);
}

#[tokio::test]
async fn test_lead_managers_cannot_create_orders() {
    let app: TestApp = setup().await;
    let lead_manager: i64 = app.add_user("leads", "lead_manager").await;

    let response: TestResponse = create_order(&app, lead_manager, &json!({ "ftd": 1 })).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_managers_only_see_their_own_orders() {
    let app: TestApp = setup().await;
    app.import_leads("filler", 1).await;
    let owner: i64 = app.add_user("owner", "affiliate_manager").await;
    let other: i64 = app.add_user("other", "affiliate_manager").await;

    let created: Value = create_order(&app, owner, &json!({ "filler": 1 })).await.json();
    let order_id: i64 = created["order"]["order_id"].as_i64().unwrap();

    let own: TestResponse = app.get(&format!("/orders/{order_id}"), owner).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.json()["leads"].as_array().unwrap().len(), 1);

    let foreign: TestResponse = app.get(&format!("/orders/{order_id}"), other).await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let listed: Value = app.get("/orders", other).await.json();
    assert_eq!(listed["total"], 0);
    let listed: Value = app.get("/orders", app.admin_id).await.json();
    assert_eq!(listed["total"], 1);
}

#[tokio::test]
async fn test_oversized_count_is_bad_request() {
    let app: TestApp = setup().await;
    app.import_leads("ftd", 2).await;

    let response: TestResponse =
        create_order(&app, app.admin_id, &json!({ "ftd": 3_000_000_000_u32 })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], true);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let app: TestApp = setup().await;

    let response: TestResponse = app.get("/orders/404", app.admin_id).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_orders_rejects_unknown_status() {
    let app: TestApp = setup().await;

    let response: TestResponse = app.get("/orders?status=shipped", app.admin_id).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_order_changes_metadata_only() {
    let app: TestApp = setup().await;
    app.import_leads("ftd", 1).await;
    let created: Value = create_order(&app, app.admin_id, &json!({ "ftd": 1 })).await.json();
    let order_id: i64 = created["order"]["order_id"].as_i64().unwrap();

    let response: TestResponse = app
        .send_json(
            Method::PATCH,
            &format!("/orders/{order_id}"),
            app.admin_id,
            &json!({ "priority": "low", "notes": "call after lunch" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let body: Value = response.json();
    assert_eq!(body["order"]["priority"], "low");
    assert_eq!(body["order"]["notes"], "call after lunch");
    assert_eq!(body["order"]["lead_ids"], created["order"]["lead_ids"]);
}

#[tokio::test]
async fn test_cancel_returns_leads_to_pool_once() {
    let app: TestApp = setup().await;
    app.import_leads("filler", 2).await;
    let created: Value = create_order(&app, app.admin_id, &json!({ "filler": 2 })).await.json();
    let order_id: i64 = created["order"]["order_id"].as_i64().unwrap();
    let cancel_uri: String = format!("/orders/{order_id}/cancel");

    let available: Value = app.get("/leads?assigned=false", app.admin_id).await.json();
    assert_eq!(available["total"], 0);

    let response: TestResponse = app
        .send_json(Method::POST, &cancel_uri, app.admin_id, &json!({ "reason": "client left" }))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let body: Value = response.json();
    assert_eq!(body["order"]["status"], "cancelled");
    assert_eq!(body["order"]["cancellation_reason"], "client left");

    let available: Value = app.get("/leads?assigned=false", app.admin_id).await.json();
    assert_eq!(available["total"], 2);

    let again: TestResponse = app
        .send_json(Method::POST, &cancel_uri, app.admin_id, &json!({ "reason": "twice" }))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_export_returns_csv_attachment() {
    let app: TestApp = setup().await;
    app.import_leads("ftd", 2).await;
    let created: Value = create_order(&app, app.admin_id, &json!({ "ftd": 2 })).await.json();
    let order_id: i64 = created["order"]["order_id"].as_i64().unwrap();

    let response: TestResponse = app.get(&format!("/orders/{order_id}/export"), app.admin_id).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        response.headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains(&format!("order_{order_id}_leads.csv"))
    );
    assert_eq!(response.body.lines().count(), 3);
    assert!(response.body.contains("ftd0@example.com"));
}

#[tokio::test]
async fn test_order_timeline_records_request_cause() {
    let app: TestApp = setup().await;
    app.import_leads("cold", 1).await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-User-Id", app.admin_id.to_string())
        .header("X-Request-Id", "req-42")
        .body(axum::body::Body::from(json!({ "cold": 1 }).to_string()))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let created: Value = serde_json::from_slice(&bytes).unwrap();
    let order_id: i64 = created["order"]["order_id"].as_i64().unwrap();

    let timeline: TestResponse = app.get(&format!("/orders/{order_id}/audit"), app.admin_id).await;

    assert_eq!(timeline.status, StatusCode::OK);
    let body: Value = timeline.json();
    let events: &Vec<Value> = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["cause_id"], "req-42");
    assert_eq!(events[0]["cause_description"], "POST /orders");
}
