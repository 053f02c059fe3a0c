//! Landing redirect and the viewer dashboard.

use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, Redirect};
use cinestream_db::models::booking::BookingDetail;
use cinestream_db::models::movie::Movie;
use cinestream_db::models::subscription::SubscriptionDetail;
use cinestream_db::repositories::{BookingRepo, RecommendationRepo, SubscriptionRepo};

use crate::error::AppResult;
use crate::handlers::today;
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireViewer;
use crate::response::{render, Layout};
use crate::state::AppState;

/// Number of items shown in each dashboard section.
const DASHBOARD_SECTION_SIZE: usize = 5;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage {
    layout: Layout,
    bookings: Vec<BookingDetail>,
    subscriptions: Vec<SubscriptionDetail>,
    recommendations: Vec<Movie>,
}

/// GET /
///
/// Sends visitors to their role's home page, or to login.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    match SessionUser::from_headers(&headers, &state.config.jwt) {
        Ok(user) => Redirect::to(user.role.home_path()),
        Err(_) => Redirect::to("/login"),
    }
}

/// GET /dashboard
///
/// Upcoming bookings for cinema-goers, active subscriptions for streamers,
/// and the top recommendations for everyone.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireViewer(user): RequireViewer,
) -> AppResult<Html<String>> {
    let today = today();

    let bookings = if user.shows_cinema() {
        BookingRepo::list_for_user(&state.pool, user.user_id)
            .await?
            .into_iter()
            .filter(|b| b.booking_date >= today)
            .take(DASHBOARD_SECTION_SIZE)
            .collect()
    } else {
        Vec::new()
    };

    let subscriptions = if user.shows_streaming() {
        SubscriptionRepo::list_for_user(&state.pool, user.user_id)
            .await?
            .into_iter()
            .filter(|s| s.is_active_on(today))
            .collect()
    } else {
        Vec::new()
    };

    let mut recommendations = RecommendationRepo::recommend_for_user(&state.pool, user.user_id).await?;
    recommendations.truncate(DASHBOARD_SECTION_SIZE);

    render(&DashboardPage {
        layout: Layout::for_user(&user),
        bookings,
        subscriptions,
        recommendations,
    })
}
