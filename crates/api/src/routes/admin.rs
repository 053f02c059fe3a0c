//! Route definitions for the admin pages, mounted at `/admin`.
//!
//! Every handler here takes `RequireAdmin`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{
    admin_bookings, admin_cinemas, admin_dashboard, admin_movies, admin_platforms,
    admin_recommendations, admin_showtimes, admin_subscriptions, admin_users,
};
use crate::state::AppState;

/// ```text
/// GET        /                  -> admin_dashboard
/// GET, POST  /movies            -> movies_page, submit_movie
/// GET, POST  /cinemas           -> cinemas_page, submit_cinema
/// GET, POST  /showtimes         -> showtimes_page, submit_showtime
/// GET, POST  /platforms         -> platforms_page, submit_platform
/// GET, POST  /users             -> users_page, submit_user
/// GET, POST  /bookings          -> bookings_page, submit_booking
/// GET, POST  /subscriptions     -> subscriptions_page, submit_subscription
/// GET, POST  /recommendations   -> recommendations_page, submit_recommendation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_dashboard::admin_dashboard))
        .route(
            "/movies",
            get(admin_movies::movies_page).post(admin_movies::submit_movie),
        )
        .route(
            "/cinemas",
            get(admin_cinemas::cinemas_page).post(admin_cinemas::submit_cinema),
        )
        .route(
            "/showtimes",
            get(admin_showtimes::showtimes_page).post(admin_showtimes::submit_showtime),
        )
        .route(
            "/platforms",
            get(admin_platforms::platforms_page).post(admin_platforms::submit_platform),
        )
        .route(
            "/users",
            get(admin_users::users_page).post(admin_users::submit_user),
        )
        .route(
            "/bookings",
            get(admin_bookings::bookings_page).post(admin_bookings::submit_booking),
        )
        .route(
            "/subscriptions",
            get(admin_subscriptions::subscriptions_page)
                .post(admin_subscriptions::submit_subscription),
        )
        .route(
            "/recommendations",
            get(admin_recommendations::recommendations_page)
                .post(admin_recommendations::submit_recommendation),
        )
}
