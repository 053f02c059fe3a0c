pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod viewer;

use axum::Router;

use crate::state::AppState;

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                          redirect by role (public)
/// /login                     login form, sign in (public)
/// /register                  registration form, create viewer (public)
/// /logout                    sign out (POST)
/// /profile                   own profile (signed in)
///
/// /movies, /movies/{id}      catalog (signed in)
/// /cinemas, /cinemas/{id}
/// /platforms, /platforms/{id}
///
/// /dashboard                 viewer home (viewer)
/// /bookings                  list, book, cancel (viewer)
/// /subscriptions             list, subscribe (viewer)
/// /recommendations           list, mark interested (viewer)
///
/// /admin                     dashboard (admin)
/// /admin/movies              add, edit, delete
/// /admin/cinemas             cinemas and cinema types
/// /admin/showtimes           schedule, delete
/// /admin/platforms           platforms and streaming prices
/// /admin/users               accounts and roles
/// /admin/bookings            edit, delete
/// /admin/subscriptions       edit, delete; payments read-only
/// /admin/recommendations     edit, delete
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(catalog::router())
        .merge(viewer::router())
        .nest("/admin", admin::router())
}
