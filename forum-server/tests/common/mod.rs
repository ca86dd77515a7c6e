//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use forum_server::api::build_app;
use forum_server::services::user_roles;
use forum_server::{Config, DbService, ServerState};

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Seeded role ids
pub const ADMIN: i64 = 1;
pub const SUPPORT: i64 = 2;
pub const MEMBER: i64 = 3;

pub struct TestApp {
    pub state: ServerState,
    router: Router,
}

impl TestApp {
    /// Fresh in-memory database with the seed data
    pub async fn new() -> Self {
        let db = DbService::in_memory().await.expect("in-memory database");
        let state = ServerState::new(Config::with_secret(SECRET), db);
        let router = build_app(&state).with_state(state.clone());
        Self { state, router }
    }

    /// Token as the identity provider would issue it
    pub fn token(&self, user_id: &str) -> String {
        self.state
            .jwt_service
            .generate_token(user_id, None, chrono::Duration::hours(1))
            .expect("token")
    }

    /// Give `user_id` exactly these roles
    pub async fn assign(&self, user_id: &str, role_ids: &[i64]) {
        user_roles::replace(&self.state.pool, "seed", user_id, role_ids)
            .await
            .expect("assign roles");
    }

    /// Token for a user holding `role_ids`
    pub async fn user_with_roles(&self, user_id: &str, role_ids: &[i64]) -> String {
        self.assign(user_id, role_ids).await;
        self.token(user_id)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

/// Numeric `code` of an error envelope
pub fn code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap_or_default()
}
