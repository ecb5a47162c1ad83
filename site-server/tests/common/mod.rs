//! Shared test fixtures
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, Response, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use site_server::auth::{SessionConfig, StaticIdentityProvider};
use site_server::core::{Config, ServerState};
use site_server::{api, db::DbService, db::DocumentStore};

pub const ADMIN_TOKEN: &str = "admin-id-token";
pub const ADMIN_EMAIL: &str = "admin@pub.test";
pub const USER_TOKEN: &str = "user-id-token";
pub const USER_EMAIL: &str = "guest@example.com";

/// A bare document store over a throwaway database
pub async fn test_store() -> (TempDir, DocumentStore) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let db = DbService::new(tmp.path())
        .await
        .expect("Failed to open test database");
    (tmp, DocumentStore::new(db.db))
}

/// Test configuration rooted at a throwaway work dir
pub fn test_config(work_dir: &TempDir) -> Config {
    Config {
        work_dir: work_dir.path().to_string_lossy().to_string(),
        http_port: 0,
        public_base_url: "http://localhost:3000".to_string(),
        identity_base_url: "http://identity.invalid".to_string(),
        identity_api_key: String::new(),
        bootstrap_admin_email: Some(ADMIN_EMAIL.to_string()),
        session: SessionConfig {
            secret: "integration-test-session-secret-0123456789".to_string(),
            ttl_days: 5,
            issuer: "site-server".to_string(),
        },
        environment: "development".to_string(),
    }
}

/// Full server state wired to a static identity provider:
/// - `ADMIN_TOKEN` verifies as the bootstrap admin
/// - `USER_TOKEN` verifies as a regular guest
pub async fn test_state() -> (TempDir, ServerState) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&tmp);
    let identity = Arc::new(
        StaticIdentityProvider::new()
            .with_account(ADMIN_TOKEN, "uid-admin", ADMIN_EMAIL)
            .with_account(USER_TOKEN, "uid-guest", USER_EMAIL),
    );
    let state = ServerState::initialize_with(&config, identity).await;
    (tmp, state)
}

/// The application router for oneshot requests
pub fn test_app(state: &ServerState) -> Router {
    api::build_app(state).with_state(state.clone())
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("Request never fails at the transport level")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}

/// Extract the session cookie pair ("name=value") from a Set-Cookie
/// response header
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|s| s.trim().to_string())
}

/// Sign in through the API and return the session cookie pair
pub async fn sign_in(app: &Router, id_token: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!("{{\"id_token\":\"{id_token}\"}}")))
        .expect("Failed to build request");
    let response = send(app, request).await;
    assert_eq!(response.status(), 200, "sign-in should succeed");
    session_cookie(&response).expect("sign-in must set the session cookie")
}

/// JSON request helper
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    builder.body(body).expect("Failed to build request")
}

/// A tiny valid PNG for upload/storage tests
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 80, 40]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes
}
