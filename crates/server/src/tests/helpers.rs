// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test app construction and request helpers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use leadflow_api::{UserInfo, bootstrap_admin};
use leadflow_domain::AllocationPolicy;
use leadflow_persistence::Persistence;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::identity::USER_ID_HEADER;
use crate::{AppState, build_router};

pub const PASSWORD: &str = "leadflow-2026";

/// A router over a fresh in-memory store with a bootstrapped admin.
pub struct TestApp {
    pub router: Router,
    pub admin_id: i64,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

pub async fn setup() -> TestApp {
    setup_with_policy(AllocationPolicy::default()).await
}

pub async fn setup_with_policy(policy: AllocationPolicy) -> TestApp {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let admin: UserInfo =
        bootstrap_admin(&mut persistence, "admin", PASSWORD, OffsetDateTime::now_utc())
            .unwrap()
            .expect("Admin should be created on an empty store");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        policy,
    };

    TestApp {
        router: build_router(app_state),
        admin_id: admin.user_id,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<i64>,
        content_type: &str,
        body: String,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type);
        if let Some(user_id) = user_id {
            builder = builder.header(USER_ID_HEADER, user_id.to_string());
        }
        let request: Request<Body> = builder.body(Body::from(body)).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status: StatusCode = response.status();
        let headers: HeaderMap = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        user_id: i64,
        body: &Value,
    ) -> TestResponse {
        self.request(
            method,
            uri,
            Some(user_id),
            "application/json",
            serde_json::to_string(body).unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str, user_id: i64) -> TestResponse {
        self.request(Method::GET, uri, Some(user_id), "application/json", String::new())
            .await
    }

    /// Creates a user through the API as the admin and returns its id.
    pub async fn add_user(&self, login_name: &str, role: &str) -> i64 {
        let response: TestResponse = self
            .send_json(
                Method::POST,
                "/users",
                self.admin_id,
                &json!({
                    "login_name": login_name,
                    "display_name": format!("{login_name} display"),
                    "password": PASSWORD,
                    "role": role,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.json()["user_id"].as_i64().unwrap()
    }

    pub async fn approve(&self, user_id: i64) {
        let response: TestResponse = self
            .send_json(
                Method::PATCH,
                &format!("/users/{user_id}"),
                self.admin_id,
                &json!({ "status": "approved" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    }

    /// Imports `count` leads of one type as the admin and returns their ids.
    pub async fn import_leads(&self, lead_type: &str, count: usize) -> Vec<i64> {
        let mut csv: String = String::from("lead_type,first_name,last_name,email,country\n");
        for i in 0..count {
            csv.push_str(&format!(
                "{lead_type},First{i},Last{i},{lead_type}{i}@example.com,Germany\n"
            ));
        }

        let response: TestResponse = self
            .request(
                Method::POST,
                "/leads/import",
                Some(self.admin_id),
                "text/csv",
                csv,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        let body: Value = response.json();
        assert_eq!(body["errors"].as_array().unwrap().len(), 0, "{body}");
        body["lead_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| id.as_i64().unwrap())
            .collect()
    }
}
