//! Test helpers: in-memory server state driven through the real router.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use order_server::auth::JwtConfig;
use order_server::{Config, ServerState, api::build_app};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-key-at-least-32-chars";

pub fn test_state() -> ServerState {
    ServerState::in_memory(Config::for_tests(JwtConfig::with_secret(TEST_SECRET)))
}

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(test_state())
    }

    pub fn with_state(state: ServerState) -> Self {
        let router = build_app(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request_raw(method, uri, token, body.map(|v| v.to_string()))
            .await
    }

    /// Send an arbitrary (possibly malformed) JSON body
    pub async fn request_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(raw) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(raw)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn signup(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Sign up + log in, returning the access token
    pub async fn register(&self, username: &str) -> String {
        let (status, _) = self.signup(username, "pw-123456").await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = self.login(username, "pw-123456").await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    pub async fn create_order(&self, token: &str, order: Value) -> (StatusCode, Value) {
        self.request("POST", "/api/orders", Some(token), Some(order))
            .await
    }

    pub async fn list_orders(&self, token: &str, query: &str) -> (StatusCode, Value) {
        self.request("GET", &format!("/api/orders{query}"), Some(token), None)
            .await
    }

    pub async fn cancel(&self, token: &str, consignment_id: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            &format!("/api/orders/{consignment_id}/cancel"),
            Some(token),
            None,
        )
        .await
    }
}

pub fn order_body(weight: f64, city: i64, amount: f64) -> Value {
    json!({
        "store_id": 131172,
        "merchant_order_id": "M-1001",
        "recipient_name": "Rahim Uddin",
        "recipient_phone": "01712345678",
        "recipient_address": "House 12, Road 4, Banani, Dhaka",
        "recipient_city": city,
        "recipient_zone": 1,
        "recipient_area": 1,
        "delivery_type": 48,
        "item_type": 2,
        "special_instruction": "Call before delivery",
        "item_quantity": 1,
        "item_weight": weight,
        "amount_to_collect": amount,
        "item_description": "Books"
    })
}
