//! HTTP-level tests for login, registration, logout and the profile page.

mod common;

use axum::http::StatusCode;
use common::{
    body_text, create_user, get, get_with_cookie, location, login, post_form, session_cookie,
    signed_in, TEST_PASSWORD,
};
use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_db::repositories::UserRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_login_redirects_to_dashboard(pool: PgPool) {
    create_user(&pool, "viewer@test.com", Role::Viewer, Preference::Both).await;
    let app = common::build_test_app(pool);

    let body = format!("email=viewer@test.com&password={TEST_PASSWORD}");
    let response = post_form(app, "/login", &body, None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_login_redirects_to_admin_home(pool: PgPool) {
    create_user(&pool, "admin@test.com", Role::Admin, Preference::Both).await;
    let app = common::build_test_app(pool);

    let body = format!("email=ADMIN@test.com&password={TEST_PASSWORD}");
    let response = post_form(app, "/login", &body, None).await;

    assert_eq!(location(&response), Some("/admin"));
    assert!(session_cookie(&response).is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_email_and_wrong_password_look_the_same(pool: PgPool) {
    create_user(&pool, "known@test.com", Role::Viewer, Preference::Both).await;

    let wrong_password = post_form(
        common::build_test_app(pool.clone()),
        "/login",
        "email=known@test.com&password=not-the-password",
        None,
    )
    .await;
    let unknown_email = post_form(
        common::build_test_app(pool),
        "/login",
        "email=nobody@test.com&password=not-the-password",
        None,
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&wrong_password).is_none());
    assert!(session_cookie(&unknown_email).is_none());

    let a = body_text(wrong_password).await;
    let b = body_text(unknown_email).await;
    assert!(a.contains("Invalid email or password"));
    assert_eq!(a, b);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_without_role_cannot_log_in(pool: PgPool) {
    let user = create_user(&pool, "norole@test.com", Role::Viewer, Preference::Both).await;
    sqlx::query("DELETE FROM viewers WHERE user_id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let body = format!("email=norole@test.com&password={TEST_PASSWORD}");
    let response = post_form(app, "/login", &body, None).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(session_cookie(&response).is_none());
    assert!(body_text(response).await.contains("Account has no role assigned"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signed_in_user_visiting_login_is_redirected_home(pool: PgPool) {
    let (_user, cookie) = signed_in(&pool, "again@test.com", Role::Viewer).await;
    let app = common::build_test_app(pool);

    let response = get_with_cookie(app, "/login", &cookie).await;

    assert_eq!(location(&response), Some("/dashboard"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn root_redirects_anonymous_visitors_to_login(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_creates_viewer_and_redirects_to_login(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/register",
        "name=New+Viewer&age=22&email=New@Test.com&password=long-enough-1&preference=cinema",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?registered=1"));

    let user = UserRepo::find_by_email(&pool, "new@test.com")
        .await
        .unwrap()
        .expect("registered user should exist");
    assert_eq!(user.preference, "cinema");
    assert_eq!(
        UserRepo::resolve_role(&pool, user.id).await.unwrap(),
        Some(Role::Viewer)
    );

    let page = get(common::build_test_app(pool.clone()), "/login?registered=1").await;
    assert!(body_text(page)
        .await
        .contains("Registration successful. Please log in."));

    let cookie = login(common::build_test_app(pool), "new@test.com", "long-enough-1").await;
    assert!(cookie.starts_with("session="));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_registration_shows_conflict_and_keeps_form(pool: PgPool) {
    create_user(&pool, "taken@test.com", Role::Viewer, Preference::Both).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/register",
        "name=Second+Person&email=taken@test.com&password=long-enough-1&preference=both",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_text(response).await;
    assert!(body.contains("An account with this email already exists"));
    assert!(body.contains("Second Person"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/register",
        "name=Shorty&email=short@test.com&password=abc&preference=both",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(UserRepo::find_by_email(&pool, "short@test.com")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Logout and profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_clears_session_cookie(pool: PgPool) {
    let (_user, cookie) = signed_in(&pool, "bye@test.com", Role::Viewer).await;
    let app = common::build_test_app(pool);

    let response = post_form(app, "/logout", "", Some(&cookie)).await;

    assert_eq!(location(&response), Some("/login"));
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_changes_name_and_reissues_cookie(pool: PgPool) {
    let (user, cookie) = signed_in(&pool, "me@test.com", Role::Viewer).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/profile",
        "action=update_profile&name=Renamed+Viewer&preference=streaming",
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_some());
    assert!(body_text(response).await.contains("Renamed Viewer"));

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Renamed Viewer");
    assert_eq!(stored.preference, "streaming");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn password_change_requires_current_password(pool: PgPool) {
    let (_user, cookie) = signed_in(&pool, "pw@test.com", Role::Viewer).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/profile",
        "action=change_password&current_password=wrong-one-00&new_password=brand-new-pass",
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The old password still works.
    login(common::build_test_app(pool), "pw@test.com", TEST_PASSWORD).await;
}
