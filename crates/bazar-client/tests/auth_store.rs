//! Integration tests for `AuthStore` and the forced-logout path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bazar_client::{
    ApiClient, AuthStatus, AuthStore, LoginRedirect, Session, AUTH_TOKEN_KEY, LOGIN_ROUTE,
};
use bazar_core::{KeyValueStore, MemoryStore};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records redirects and moves to the login route when asked, like a router.
struct RecordingRedirect {
    route: Mutex<String>,
    redirects: AtomicUsize,
}

impl RecordingRedirect {
    fn on(route: &str) -> Arc<Self> {
        Arc::new(Self {
            route: Mutex::new(route.to_string()),
            redirects: AtomicUsize::new(0),
        })
    }

    fn count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl LoginRedirect for RecordingRedirect {
    fn current_route(&self) -> String {
        self.route.lock().expect("route lock").clone()
    }

    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        *self.route.lock().expect("route lock") = LOGIN_ROUTE.to_string();
    }
}

fn store_with(token: Option<&str>) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    if let Some(token) = token {
        store.set(AUTH_TOKEN_KEY, token).expect("memory store write");
    }
    store
}

fn auth_store(base_url: &str, store: Arc<MemoryStore>, nav: Arc<RecordingRedirect>) -> AuthStore {
    let session = Arc::new(Session::restore(store, nav));
    let client = ApiClient::new(base_url, 30, None, session).expect("client");
    AuthStore::new(client)
}

#[tokio::test]
async fn verify_403_logs_out_and_redirects_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verify"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "Forbidden"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("stale"));
    let nav = RecordingRedirect::on("/admin");
    let auth = auth_store(&server.uri(), store.clone(), nav.clone());

    let outcome = auth.verify().await;

    assert!(!outcome.is_authenticated);
    assert!(!auth.is_authenticated());
    assert_eq!(store.get(AUTH_TOKEN_KEY).expect("read"), None);
    assert_eq!(nav.count(), 1);
    let snapshot = auth.snapshot();
    assert_eq!(snapshot.status, AuthStatus::SessionInvalid);
    assert_eq!(snapshot.error.as_deref(), Some("Sesión expirada"));
}

#[tokio::test]
async fn unauthorized_on_login_route_does_not_redirect() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verify"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let nav = RecordingRedirect::on("/login");
    let auth = auth_store(&server.uri(), store_with(Some("stale")), nav.clone());

    let outcome = auth.verify().await;
    assert!(!outcome.is_authenticated);
    assert_eq!(nav.count(), 0);
}

#[tokio::test]
async fn verify_without_token_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let auth = auth_store(&server.uri(), store_with(None), RecordingRedirect::on("/"));
    let outcome = auth.init().await;
    assert!(!outcome.is_authenticated);
    assert_eq!(auth.snapshot().status, AuthStatus::Anonymous);
}

#[tokio::test]
async fn login_persists_token_and_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(serde_json::json!({"username": "admin", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": {"token": "fresh", "user": {"id": 1, "username": "admin", "role": "admin"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(None);
    let auth = auth_store(&server.uri(), store.clone(), RecordingRedirect::on("/login"));

    let snapshot = auth.login(" admin ", "pw").await.expect("login");
    assert!(snapshot.is_authenticated());
    assert_eq!(
        snapshot.user.and_then(|u| u.username).as_deref(),
        Some("admin")
    );
    assert_eq!(store.get(AUTH_TOKEN_KEY).expect("read").as_deref(), Some("fresh"));
}

#[tokio::test]
async fn login_without_user_follows_up_with_verify() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": "bare-token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verify"))
        .and(header("authorization", "Bearer bare-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": {"user": {"username": "ana"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = auth_store(&server.uri(), store_with(None), RecordingRedirect::on("/login"));
    let snapshot = auth.login("ana", "pw").await.expect("login");
    assert_eq!(snapshot.token.as_deref(), Some("bare-token"));
    assert_eq!(snapshot.user.and_then(|u| u.username).as_deref(), Some("ana"));
}

#[tokio::test]
async fn failed_follow_up_verify_keeps_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": {"token": "t1"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verify"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let auth = auth_store(&server.uri(), store_with(None), RecordingRedirect::on("/login"));
    let snapshot = auth.login("ana", "pw").await.expect("login");
    assert!(snapshot.is_authenticated());
    assert!(snapshot.user.is_none());
}

#[tokio::test]
async fn login_failure_records_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "Credenciales inválidas"
        })))
        .mount(&server)
        .await;

    let auth = auth_store(&server.uri(), store_with(None), RecordingRedirect::on("/login"));
    let err = auth.login("ana", "bad").await.expect_err("should fail");
    assert_eq!(err.user_message(), "Credenciales inválidas");

    let snapshot = auth.snapshot();
    assert_eq!(snapshot.status, AuthStatus::Anonymous);
    assert_eq!(snapshot.error.as_deref(), Some("Credenciales inválidas"));
}

#[tokio::test]
async fn logout_clears_stored_token() {
    let store = store_with(Some("tok"));
    let server = MockServer::start().await;
    let auth = auth_store(&server.uri(), store.clone(), RecordingRedirect::on("/"));
    assert!(auth.is_authenticated());

    auth.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(store.get(AUTH_TOKEN_KEY).expect("read"), None);
}
