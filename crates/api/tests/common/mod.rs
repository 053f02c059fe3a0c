#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cinestream_api::auth::jwt::JwtConfig;
use cinestream_api::auth::password::hash_password;
use cinestream_api::config::ServerConfig;
use cinestream_api::router::build_app_router;
use cinestream_api::state::AppState;
use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_db::models::user::{CreateUser, User};
use cinestream_db::repositories::UserRepo;

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "correct-horse-42";

/// Build a test `ServerConfig` with safe defaults and a fixed secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        cookie_secure: false,
        jwt: JwtConfig {
            secret: "integration-test-session-secret".to_string(),
            session_expiry_hours: 1,
        },
        bootstrap_admin: None,
    }
}

/// Build the full application router with all middleware layers.
///
/// Goes through [`build_app_router`] so the tests exercise the same stack as
/// the binary.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the given role.
pub async fn create_user(pool: &PgPool, email: &str, role: Role, preference: Preference) -> User {
    let input = CreateUser {
        name: format!("User {email}"),
        age: Some(30),
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        preference,
        role,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through `POST /login` and return the `session=...` cookie pair.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = format!("email={email}&password={password}");
    let response = post_form(app, "/login", &body, None).await;
    assert!(
        response.status().is_redirection(),
        "login should redirect, got {}",
        response.status()
    );
    session_cookie(&response).expect("login should set the session cookie")
}

/// Create a user and return it together with a live session cookie.
pub async fn signed_in(pool: &PgPool, email: &str, role: Role) -> (User, String) {
    let user = create_user(pool, email, role, Preference::Both).await;
    let cookie = login(build_test_app(pool.clone()), email, TEST_PASSWORD).await;
    (user, cookie)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(cookie)).await
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form(
    app: Router,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body.to_string()), cookie).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<String>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Target of a redirect response.
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `session=<token>` pair from a `Set-Cookie` header, if one was set
/// with a non-empty value.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("session=") && pair.len() > "session=".len())
        .map(str::to_string)
}
