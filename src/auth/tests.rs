//! Tests for session-token authentication

use super::*;
use reqwest::Client;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(mock_uri: &str, credentials: Credentials) -> SessionProvider {
    SessionProvider::new(
        credentials,
        format!("{mock_uri}/api/account/login"),
        Client::new(),
    )
}

#[test]
fn test_cached_token_expiry() {
    let token = CachedToken::expires_in("st".to_string(), 3600);
    assert!(!token.is_expired());

    let token = CachedToken::expires_in("st".to_string(), -100);
    assert!(token.is_expired());

    // Within the 30s refresh buffer counts as expired
    let token = CachedToken::expires_in("st".to_string(), 10);
    assert!(token.is_expired());

    let token = CachedToken::new("st".to_string(), None);
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_login_handshake_and_caching() {
    let mock_server = MockServer::start().await;

    // The handshake must run exactly once for two token requests
    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .and(body_partial_json(serde_json::json!({
            "login": { "login": "alice@example.com" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session": {
                "token": "st-abc",
                "expiresIn": 3600,
                "profile": "/api/account/profile/u1"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider(
        &mock_server.uri(),
        Credentials::login_password("alice@example.com", "secret"),
    );

    assert_eq!(provider.current_token().await.unwrap(), "st-abc");
    assert_eq!(provider.current_token().await.unwrap(), "st-abc");
}

#[tokio::test]
async fn test_invalidate_forces_new_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session": { "token": "st-1" }
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let provider = provider(
        &mock_server.uri(),
        Credentials::login_password("alice@example.com", "secret"),
    );

    assert_eq!(provider.current_token().await.unwrap(), "st-1");
    provider.invalidate().await;
    assert_eq!(provider.current_token().await.unwrap(), "st-1");
}

#[tokio::test]
async fn test_login_failure_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad credentials"))
        .mount(&mock_server)
        .await;

    let provider = provider(
        &mock_server.uri(),
        Credentials::login_password("alice@example.com", "wrong"),
    );

    let err = provider.current_token().await.unwrap_err();
    assert!(matches!(err, crate::error::Error::Auth { .. }));
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_static_token_skips_handshake() {
    // No mock server mounted; any HTTP call would fail
    let provider = SessionProvider::new(
        Credentials::token("api-token-1"),
        "http://localhost:1/api/account/login",
        Client::new(),
    );

    assert_eq!(provider.current_token().await.unwrap(), "api-token-1");
    // Logout is a no-op for static tokens
    provider.logout().await.unwrap();
}

#[tokio::test]
async fn test_apply_sets_session_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(header(SESSION_TOKEN_HEADER, "api-token-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let provider = SessionProvider::new(
        Credentials::token("api-token-1"),
        format!("{}/api/account/login", mock_server.uri()),
        Client::new(),
    );

    let client = Client::new();
    let req = client.get(format!("{}/api/projects", mock_server.uri()));
    let response = provider.apply(req).await.unwrap().send().await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_logout_deletes_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session": { "token": "st-1" }
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/account/login"))
        .and(header(SESSION_TOKEN_HEADER, "st-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider(
        &mock_server.uri(),
        Credentials::login_password("alice@example.com", "secret"),
    );

    provider.current_token().await.unwrap();
    provider.logout().await.unwrap();
}
