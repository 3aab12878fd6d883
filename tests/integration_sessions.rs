mod common;

use axum::http::{StatusCode, header};
use common::{
    body_json, get, location, request, send, session_config, set_cookie, setup_test_app, sign_in,
    signed_up, test_state,
};
use rollcall::router::init_router;
use rollcall_auth::RoleGroups;
use rollcall_config::{RateLimitConfig, SessionConfig};
use rollcall_core::Role;

#[tokio::test]
async fn test_sign_in_sets_only_that_roles_session() {
    let app = setup_test_app();
    signed_up(&app, Role::Student, "a@x.com", "pw1").await;

    let response = sign_in(&app, "students", "a@x.com", "pw1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, "teacher_session").is_none());
    let cookie = set_cookie(&response, "student_session").unwrap();
    let body = body_json(response).await;
    assert_eq!(body["message"], "Signed in successfully.");

    let student = get(&app, "/students/session", &[&cookie]).await;
    assert_eq!(student.status(), StatusCode::OK);

    let teacher = get(&app, "/teachers/session", &[&cookie]).await;
    assert_eq!(teacher.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&teacher), Some("/teachers/sign_in"));
}

#[tokio::test]
async fn test_sign_in_as_other_role_is_rejected() {
    let app = setup_test_app();
    signed_up(&app, Role::Student, "a@x.com", "pw1").await;

    let response = sign_in(&app, "teachers", "a@x.com", "pw1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response, "teacher_session").is_none());
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password.");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = setup_test_app();
    signed_up(&app, Role::Student, "a@x.com", "pw1").await;

    let wrong_password = sign_in(&app, "students", "a@x.com", "nope").await;
    let unknown_email = sign_in(&app, "students", "z@x.com", "pw1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong_password).await, body_json(unknown_email).await);
}

#[tokio::test]
async fn test_student_sign_out_keeps_teacher_session() {
    let app = setup_test_app();
    let student = signed_up(&app, Role::Student, "a@x.com", "pw1").await;
    let teacher = signed_up(&app, Role::Teacher, "b@x.com", "pw2").await;

    let response = send(
        &app,
        request("DELETE", "/students/sign_out", &[&student, &teacher], None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookie(&response, "student_session").unwrap();
    assert_eq!(cleared, "student_session=");
    assert!(set_cookie(&response, "teacher_session").is_none());
    let body = body_json(response).await;
    assert_eq!(body["message"], "Signed out successfully.");

    let student_session = get(&app, "/students/session", &[&student, &teacher]).await;
    assert_eq!(student_session.status(), StatusCode::SEE_OTHER);

    let teacher_session = get(&app, "/teachers/session", &[&student, &teacher]).await;
    assert_eq!(teacher_session.status(), StatusCode::OK);
    let body = body_json(teacher_session).await;
    assert_eq!(body["account"]["email"], "b@x.com");
}

#[tokio::test]
async fn test_sign_out_without_session_succeeds() {
    let app = setup_test_app();

    let response = send(&app, request("DELETE", "/teachers/sign_out", &[], None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sign_in_again_revokes_previous_session() {
    let app = setup_test_app();
    let first = signed_up(&app, Role::Student, "a@x.com", "pw1").await;

    let response = send(
        &app,
        request(
            "POST",
            "/students/sign_in",
            &[&first],
            Some(serde_json::json!({ "email": "a@x.com", "password": "pw1" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = set_cookie(&response, "student_session").unwrap();

    let old = get(&app, "/students/session", &[&first]).await;
    assert_eq!(old.status(), StatusCode::SEE_OTHER);
    let new = get(&app, "/students/session", &[&second]).await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_moved_to_other_roles_cookie_is_rejected() {
    let app = setup_test_app();
    let student = signed_up(&app, Role::Student, "a@x.com", "pw1").await;
    let token = student.trim_start_matches("student_session=");
    let forged = format!("teacher_session={token}");

    let response = get(&app, "/teachers/session", &[&forged]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/teachers/sign_in"));
}

#[tokio::test]
async fn test_garbage_cookie_is_signed_out() {
    let app = setup_test_app();

    let response = get(&app, "/students/session", &["student_session=garbage"]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_expired_session_is_signed_out() {
    let expiring = SessionConfig {
        ttl_secs: 0,
        ..session_config()
    };
    let app = init_router(test_state(
        RoleGroups::defaults(),
        expiring,
        RateLimitConfig::disabled(),
    ));
    let cookie = signed_up(&app, Role::Student, "a@x.com", "pw1").await;

    let response = get(&app, "/students/session", &[&cookie]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/students/sign_in"));
}

#[tokio::test]
async fn test_sign_in_form_describes_role() {
    let app = setup_test_app();

    let response = get(&app, "/teachers/sign_in", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "teacher");
    assert_eq!(body["action"], "/teachers/sign_in");
    assert_eq!(body["method"], "POST");

    let unknown = get(&app, "/admins/sign_in", &[]).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_cookie_attributes_and_no_store() {
    let app = setup_test_app();
    signed_up(&app, Role::Teacher, "b@x.com", "pw2").await;

    let response = sign_in(&app, "teachers", "b@x.com", "pw2").await;
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("SameSite=Lax"));
    assert!(raw.contains("Path=/"));
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
}
