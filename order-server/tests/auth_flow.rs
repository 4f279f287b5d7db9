mod common;

use common::{TEST_SECRET, TestApp};
use http::StatusCode;
use order_server::ErrorCode;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use order_server::auth::{Claims, JwtConfig, JwtService};
use shared::util::now_secs;

/// 用测试密钥签发指定过期时间的令牌
fn token_expiring_at(username: &str, user_id: i64, exp: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
        exp,
        iat: now_secs() - 60,
        iss: "order-server".to_string(),
        aud: "order-clients".to_string(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
    assert_eq!(body["data"]["cache"], "ok");
}

#[tokio::test]
async fn test_signup_login_response_shape() {
    let app = TestApp::new();

    let (status, body) = app.signup("merchant@example.com", "secret").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = app.login("merchant@example.com", "secret").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["token_type"], "Bearer");
    assert_eq!(data["expires_in"], 86_400);
    assert_eq!(data["username"], "merchant@example.com");
    assert!(data["user_id"].as_i64().unwrap() > 0);
    assert!(!data["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_rejects_empty_fields() {
    let app = TestApp::new();
    let (status, body) = app.signup("", "secret").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::RequiredField.code());
}

#[tokio::test]
async fn test_duplicate_signup_is_conflict_and_keeps_credentials() {
    let app = TestApp::new();
    app.signup("alice", "original").await;

    let (status, body) = app.signup("alice", "hijack").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], ErrorCode::UsernameExists.code());
    assert_eq!(body["message"], "username already exists");

    let (status, _) = app.login("alice", "original").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.login("alice", "hijack").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures_are_identical() {
    let app = TestApp::new();
    app.signup("alice", "right").await;

    let (s1, wrong_password) = app.login("alice", "wrong").await;
    let (s2, unknown_user) = app.login("mallory", "right").await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s1, s2);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["code"], ErrorCode::InvalidCredentials.code());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let (status, body) = app.request("GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());

    let (status, _) = app.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_every_token_failure_looks_the_same() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    // 签名错误
    let foreign = JwtService::with_config(JwtConfig::with_secret(
        "some-other-secret-key-of-at-least-32-chars",
    ))
    .issue("alice", 1)
    .unwrap()
    .token;

    // 过期
    let mut expired_config = JwtConfig::with_secret(TEST_SECRET);
    expired_config.expiration_minutes = -5;
    let expired = JwtService::with_config(expired_config)
        .issue("alice", 1)
        .unwrap()
        .token;

    // 已吊销
    let (status, _) = app
        .request("POST", "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let mut bodies = Vec::new();
    for bad in [foreign.as_str(), expired.as_str(), token.as_str(), "garbage"] {
        let (status, body) = app.request("GET", "/api/orders", Some(bad), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        bodies.push(body);
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(bodies[0]["code"], ErrorCode::NotAuthenticated.code());
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    let request = http::Request::builder()
        .uri("/api/orders")
        .header(http::header::AUTHORIZATION, format!("Token {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_then_relogin() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    let (status, _) = app.list_orders(&token, "").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("POST", "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.list_orders(&token, "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 重复登出同一令牌: 令牌已不可用
    let (status, _) = app
        .request("POST", "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.login("alice", "pw-123456").await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["data"]["access_token"].as_str().unwrap();
    let (status, _) = app.list_orders(fresh, "").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_revocations_are_pruned_after_expiry() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    app.request("POST", "/api/auth/logout", Some(&token), None)
        .await;

    let revocations = app.state.jwt_service.revocations();
    assert_eq!(revocations.len(), 1);
    assert_eq!(revocations.prune(shared::util::now_secs()), 0);
    assert_eq!(revocations.prune(i64::MAX), 1);
    assert!(revocations.is_empty());
}

#[tokio::test]
async fn test_recently_expired_token_is_rejected() {
    let app = TestApp::new();
    app.register("alice").await;

    let token = token_expiring_at("alice", 1, now_secs() - 20);
    let (status, body) = app.list_orders(&token, "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());
}

#[tokio::test]
async fn test_logged_out_token_stays_rejected_after_prune() {
    let app = TestApp::new();
    app.register("alice").await;

    let token = token_expiring_at("alice", 1, now_secs() + 1);
    let (status, _) = app.list_orders(&token, "").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("POST", "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
    let revocations = app.state.jwt_service.revocations();
    assert_eq!(revocations.prune(now_secs()), 1);
    assert!(revocations.is_empty());

    let (status, _) = app.list_orders(&token, "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
