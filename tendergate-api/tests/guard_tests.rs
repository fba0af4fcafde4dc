/// Guard behavior at the router level
///
/// These tests exercise the route guard, role guard, and session layer over
/// the assembled router. Every case here is decided before any query runs,
/// so no database is required (the pool is lazy and never connects).

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{bearer, lazy_app, session_token};
use tendergate_shared::models::account::AccountRole;
use tower::ServiceExt;
use uuid::Uuid;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_as(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(token))
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Location header")
}

#[tokio::test]
async fn unauthenticated_dashboard_redirects_to_login() {
    let app = lazy_app();

    let response = app.oneshot(get("/v1/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn garbage_session_cookie_redirects_to_login() {
    let app = lazy_app();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/account/profile")
        .header(header::COOKIE, "tg_session=not-a-real-token")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn unauthenticated_onboarding_status_is_401_not_redirect() {
    // JSON endpoints answer 401; only guarded navigation redirects.
    let app = lazy_app();

    let response = app.oneshot(get("/v1/onboarding-status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unauthenticated_next_step_is_401() {
    let app = lazy_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/onboarding/next-step")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"currentStep":"choose_plan","nextStep":"payment"}"#,
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_route_redirects_unauthenticated_to_login() {
    let app = lazy_app();

    let response = app.oneshot(get("/v1/admin/accounts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn admin_route_redirects_standard_role_to_dashboard() {
    // The role guard decides on the session claims alone, so a standard
    // account is turned away before any database access.
    let app = lazy_app();
    let token = session_token(Uuid::new_v4(), AccountRole::Standard);

    let response = app
        .oneshot(get_as("/v1/admin/overview", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let app = lazy_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/logout")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("Set-Cookie header");
    assert!(set_cookie.starts_with("tg_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn register_validation_fails_before_any_query() {
    let app = lazy_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email":"not-an-email","password":"short"}"#,
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn confirm_email_requires_a_token() {
    let app = lazy_app();

    let response = app.oneshot(get("/v1/confirm-email?token=")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
