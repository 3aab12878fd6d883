#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall_auth::{RoleGroup, RoleGroups};
use rollcall_config::{CorsConfig, RateLimitConfig, SessionConfig};
use rollcall_core::Role;
use rollcall_db::Store;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub fn session_config() -> SessionConfig {
    SessionConfig {
        secret: TEST_SECRET.to_string(),
        ..SessionConfig::default()
    }
}

pub fn test_state(
    role_groups: RoleGroups,
    session_config: SessionConfig,
    rate_limit_config: RateLimitConfig,
) -> AppState {
    AppState::new(
        Store::memory(4),
        session_config,
        role_groups,
        CorsConfig::default(),
        rate_limit_config,
    )
}

/// Default groups (`user = student, teacher`), no rate limiting.
pub fn setup_test_app() -> Router {
    init_router(test_state(
        RoleGroups::defaults(),
        session_config(),
        RateLimitConfig::disabled(),
    ))
}

/// `user = teacher, student`.
pub fn setup_teacher_first_app() -> Router {
    let groups = RoleGroups::defaults().with_group(
        RoleGroup::new("user", vec![Role::Teacher, Role::Student]).unwrap(),
    );
    init_router(test_state(
        groups,
        session_config(),
        RateLimitConfig::disabled(),
    ))
}

pub fn request(method: &str, uri: &str, cookies: &[&str], body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookies: &[&str]) -> Response<Body> {
    send(app, request("GET", uri, cookies, None)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` pair set for `name`, if the response sets it.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

pub async fn sign_up(app: &Router, scope: &str, email: &str, password: &str) -> Response<Body> {
    send(
        app,
        request(
            "POST",
            &format!("/{scope}/sign_up"),
            &[],
            Some(json!({ "email": email, "password": password, "name": "Test Account" })),
        ),
    )
    .await
}

pub async fn sign_in(app: &Router, scope: &str, email: &str, password: &str) -> Response<Body> {
    send(
        app,
        request(
            "POST",
            &format!("/{scope}/sign_in"),
            &[],
            Some(json!({ "email": email, "password": password })),
        ),
    )
    .await
}

/// Registers an account for `role` and returns its session cookie.
pub async fn signed_up(app: &Router, role: Role, email: &str, password: &str) -> String {
    let response = sign_up(app, role.scope(), email, password).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    set_cookie(&response, role.cookie_name()).unwrap()
}
