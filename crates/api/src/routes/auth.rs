//! Route definitions for signing in and out.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, home, profile};
use crate::state::AppState;

/// ```text
/// GET        /          -> index
/// GET, POST  /login     -> login_page, login
/// GET, POST  /register  -> register_page, register
/// POST       /logout    -> logout
/// GET, POST  /profile   -> profile_page, update_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route(
            "/profile",
            get(profile::profile_page).post(profile::update_profile),
        )
}
