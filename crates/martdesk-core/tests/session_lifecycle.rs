//! Integration tests for login, logout and session verification.


use fixtures::{error_response, login_ok, me_ok, Harness};
use martdesk_core::auth::{AuthPhase, Session};
use martdesk_core::models::Role;
use martdesk_core::{LoginOutcome, TokenStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_success_sets_session_and_persists_token() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "pw" })))
        .respond_with(login_ok("jwt-1", "a@b.com", "ADMIN"))
        .expect(1)
        .mount(&h.server)
        .await;

    let session = h.session();
    let outcome = session.login("a@b.com", "pw").await;

    assert!(outcome.is_success());
    assert!(session.is_authenticated());
    assert_eq!(session.phase(), AuthPhase::Authenticated);
    let user = session.user().unwrap();
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.role, Role::Admin);
    assert_eq!(session.session().token.as_deref(), Some("jwt-1"));
    assert_eq!(h.tokens.get().unwrap().as_deref(), Some("jwt-1"));
}

#[tokio::test]
async fn test_login_then_logout_clears_everything() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(login_ok("jwt-2", "a@b.com", "EMPLOYEE"))
        .mount(&h.server)
        .await;

    let session = h.session();
    for _ in 0..2 {
        assert!(session.login("a@b.com", "pw").await.is_success());
        session.logout();

        assert_eq!(session.session(), Session::default());
        assert_eq!(session.phase(), AuthPhase::Unauthenticated);
        assert_eq!(h.tokens.get().unwrap(), None);
    }
}

#[tokio::test]
async fn test_login_failure_reports_server_message() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(error_response(401, "Invalid credentials"))
        .mount(&h.server)
        .await;

    let session = h.session();
    let outcome = session.login("a@b.com", "wrong").await;

    assert_eq!(outcome, LoginOutcome::Failed("Invalid credentials".to_string()));
    assert!(!session.is_authenticated());
    assert_eq!(session.phase(), AuthPhase::Unauthenticated);
    assert_eq!(h.tokens.get().unwrap(), None);
}

#[tokio::test]
async fn test_login_failure_without_body_uses_fallback() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let session = h.session();
    let outcome = session.login("a@b.com", "pw").await;

    assert_eq!(outcome.error(), Some("Login failed"));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_login_failure_hides_unrecognized_bodies() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad creds", "code": 17 })),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "b@c.com", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(502)
                .set_body_string("<html><body><h1>502 Bad Gateway</h1></body></html>"),
        )
        .mount(&h.server)
        .await;

    let session = h.session();
    assert_eq!(session.login("a@b.com", "pw").await.error(), Some("Login failed"));
    assert_eq!(session.login("b@c.com", "pw").await.error(), Some("Login failed"));
    assert!(!session.is_authenticated());
    assert_eq!(h.tokens.get().unwrap(), None);
}

#[tokio::test]
async fn test_check_auth_without_token_makes_no_request() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(me_ok("a@b.com", "ADMIN"))
        .expect(0)
        .mount(&h.server)
        .await;

    let session = h.session();
    assert!(!session.check_auth().await);
    assert!(!session.is_authenticated());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_check_auth_with_valid_token() {
    let h = Harness::start().await;
    h.tokens.set("good-token").unwrap();
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer good-token"))
        .respond_with(me_ok("manager@shop.test", "INVENTORY_MANAGER"))
        .expect(1)
        .mount(&h.server)
        .await;

    let session = h.session();
    assert!(session.check_auth().await);
    assert!(session.has_role(Role::InventoryManager));
    assert_eq!(session.session().token.as_deref(), Some("good-token"));
}

#[tokio::test]
async fn test_check_auth_rejected_token_is_removed_idempotently() {
    let h = Harness::start().await;
    h.tokens.set("expired").unwrap();
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(error_response(401, "Token expired"))
        .expect(1)
        .mount(&h.server)
        .await;

    let session = h.session();
    assert!(!session.check_auth().await);
    assert_eq!(h.tokens.get().unwrap(), None);
    assert_eq!(session.session(), Session::default());

    // Second call finds no token and stays put without another request
    assert!(!session.check_auth().await);
    assert_eq!(session.session(), Session::default());
}

#[tokio::test]
async fn test_check_auth_server_error_fails_closed() {
    let h = Harness::start().await;
    h.tokens.set("maybe-valid").unwrap();
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.server)
        .await;

    let session = h.session();
    assert!(!session.check_auth().await);
    assert_eq!(h.tokens.get().unwrap(), None);
    assert_eq!(session.phase(), AuthPhase::Unauthenticated);
}
