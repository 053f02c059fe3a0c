//! Admin landing page.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use cinestream_db::models::dashboard::AdminStats;
use cinestream_db::models::recommendation::RecommendationDetail;
use cinestream_db::repositories::{DashboardRepo, RecommendationRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render, Layout};
use crate::state::AppState;

/// Number of activity rows shown on the dashboard.
const RECENT_ACTIVITY_LIMIT: i64 = 10;

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
struct AdminDashboardPage {
    layout: Layout,
    stats: AdminStats,
    recent: Vec<RecommendationDetail>,
}

/// GET /admin
pub async fn admin_dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Html<String>> {
    let stats = DashboardRepo::stats(&state.pool).await?;
    let recent = RecommendationRepo::list_recent(&state.pool, RECENT_ACTIVITY_LIMIT).await?;

    render(&AdminDashboardPage {
        layout: Layout::for_user(&admin),
        stats,
        recent,
    })
}
