//! Route definitions for viewer pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::{booking, home, recommendation, subscription};
use crate::state::AppState;

/// ```text
/// GET        /dashboard        -> dashboard
/// GET, POST  /bookings         -> bookings_page, submit_booking
/// GET, POST  /subscriptions    -> subscriptions_page, submit_subscription
/// GET, POST  /recommendations  -> recommendations_page, submit_interest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(home::dashboard))
        .route(
            "/bookings",
            get(booking::bookings_page).post(booking::submit_booking),
        )
        .route(
            "/subscriptions",
            get(subscription::subscriptions_page).post(subscription::submit_subscription),
        )
        .route(
            "/recommendations",
            get(recommendation::recommendations_page).post(recommendation::submit_interest),
        )
}
