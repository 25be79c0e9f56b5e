//! Hosted backend adapter tests
//!
//! Drives the identity and role-store adapters against a mock backend.

use std::sync::Arc;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pd_access::{AuthEvent, IdentityProvider, Role, RoleStore};
use pd_config::BackendConfig;
use pd_platform::{HostedIdentityProvider, HostedRoleStore, PlatformError};

const USER_ID: &str = "3f0a20e4-9cf2-41a3-9c2b-0f6a3d2f5b11";

fn backend_config(server: &MockServer) -> BackendConfig {
    BackendConfig {
        base_url: server.uri(),
        anon_key: "anon-key".to_string(),
        request_timeout_secs: 5,
    }
}

fn token_response() -> serde_json::Value {
    serde_json::json!({
        "access_token": "access-123",
        "refresh_token": "refresh-456",
        "expires_in": 3600,
        "token_type": "bearer"
    })
}

async fn mock_password_grant(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sign_in_stores_token_and_emits_event() {
    let server = MockServer::start().await;
    mock_password_grant(&server, ResponseTemplate::new(200).set_body_json(token_response())).await;

    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();
    let mut events = identity.subscribe();

    identity.sign_in("owner@example.com", "hunter2").await.unwrap();

    assert!(identity.has_session());
    assert_eq!(identity.access_token().as_deref(), Some("access-123"));
    assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedIn);
}

#[tokio::test]
async fn test_sign_in_rejects_bad_credentials_without_event() {
    let server = MockServer::start().await;
    mock_password_grant(
        &server,
        ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })),
    )
    .await;

    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();
    let mut events = identity.subscribe();

    let result = identity.sign_in("owner@example.com", "wrong").await;
    assert!(matches!(result, Err(PlatformError::InvalidCredentials)));
    assert!(!identity.has_session());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_current_principal_without_session_skips_network() {
    let server = MockServer::start().await;
    // No /auth/v1/user mock mounted; the adapter must not need one.
    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();

    let principal = identity.current_principal().await.unwrap();
    assert!(principal.is_none());
}

#[tokio::test]
async fn test_current_principal_after_sign_in() {
    let server = MockServer::start().await;
    mock_password_grant(&server, ResponseTemplate::new(200).set_body_json(token_response())).await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": USER_ID,
            "email": "owner@example.com"
        })))
        .mount(&server)
        .await;

    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();
    identity.sign_in("owner@example.com", "hunter2").await.unwrap();

    let principal = identity.current_principal().await.unwrap().unwrap();
    assert_eq!(principal.id, USER_ID);
    assert_eq!(principal.email.as_deref(), Some("owner@example.com"));
}

#[tokio::test]
async fn test_rejected_token_resolves_to_no_principal() {
    let server = MockServer::start().await;
    mock_password_grant(&server, ResponseTemplate::new(200).set_body_json(token_response())).await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();
    identity.sign_in("owner@example.com", "hunter2").await.unwrap();

    let principal = identity.current_principal().await.unwrap();
    assert!(principal.is_none());
}

#[tokio::test]
async fn test_refresh_rotates_token_and_emits_event() {
    let server = MockServer::start().await;
    mock_password_grant(&server, ResponseTemplate::new(200).set_body_json(token_response())).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-789",
            "refresh_token": "refresh-790",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();
    identity.sign_in("owner@example.com", "hunter2").await.unwrap();
    let mut events = identity.subscribe();

    assert!(identity.refresh().await.unwrap());
    assert_eq!(identity.access_token().as_deref(), Some("access-789"));
    assert_eq!(events.recv().await.unwrap(), AuthEvent::TokenRefreshed);
}

#[tokio::test]
async fn test_refresh_without_session_is_a_no_op() {
    let server = MockServer::start().await;
    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();
    assert!(!identity.refresh().await.unwrap());
}

#[tokio::test]
async fn test_sign_out_clears_session_and_emits_event() {
    let server = MockServer::start().await;
    mock_password_grant(&server, ResponseTemplate::new(200).set_body_json(token_response())).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let identity = HostedIdentityProvider::new(&backend_config(&server)).unwrap();
    identity.sign_in("owner@example.com", "hunter2").await.unwrap();
    let mut events = identity.subscribe();

    identity.sign_out().await.unwrap();

    assert!(!identity.has_session());
    assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut);
}

async fn role_store_with(server: &MockServer) -> HostedRoleStore {
    let config = backend_config(server);
    let identity = Arc::new(HostedIdentityProvider::new(&config).unwrap());
    HostedRoleStore::new(&config, identity).unwrap()
}

#[tokio::test]
async fn test_role_lookup_parses_known_role() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_roles"))
        .and(query_param("user_id", format!("eq.{USER_ID}")))
        .and(query_param("select", "role"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "role": "property_manager" }])),
        )
        .mount(&server)
        .await;

    let store = role_store_with(&server).await;
    let role = store.role_for_principal(USER_ID).await.unwrap();
    assert_eq!(role, Some(Role::Manager));
}

#[tokio::test]
async fn test_role_lookup_fails_closed_on_unknown_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_roles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "role": "landlord" }])),
        )
        .mount(&server)
        .await;

    let store = role_store_with(&server).await;
    let role = store.role_for_principal(USER_ID).await.unwrap();
    assert_eq!(role, None);
}

#[tokio::test]
async fn test_role_lookup_empty_result_is_no_role() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let store = role_store_with(&server).await;
    let role = store.role_for_principal(USER_ID).await.unwrap();
    assert_eq!(role, None);
}

#[tokio::test]
async fn test_role_lookup_surfaces_backend_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_roles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = role_store_with(&server).await;
    let result = store.role_for_principal(USER_ID).await;
    assert!(result.is_err());
}
