//! Viewer recommendations.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input;
use cinestream_core::recommendation::REASON_INTERESTED;
use cinestream_db::models::movie::Movie;
use cinestream_db::models::recommendation::CreateRecommendation;
use cinestream_db::repositories::{MovieRepo, RecommendationRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::unknown_action;
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireViewer;
use crate::response::{render_with_status, Layout, Notice, Submission};
use crate::state::AppState;

/// Body of `POST /recommendations`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InterestForm {
    pub action: String,
    pub movie_id: String,
}

#[derive(Template)]
#[template(path = "recommendations.html")]
struct RecommendationsPage {
    layout: Layout,
    personalised: bool,
    movies: Vec<Movie>,
    catalog: Vec<Movie>,
}

/// GET /recommendations
///
/// Genre matches from the viewer's activity, or the global top rated
/// movies when there is no activity yet.
pub async fn recommendations_page(
    State(state): State<AppState>,
    RequireViewer(user): RequireViewer,
) -> AppResult<Response> {
    render_page(&state, &user, StatusCode::OK, None).await
}

/// POST /recommendations
///
/// `action=mark_interested` logs interest in a movie, which seeds future
/// recommendations the same way a booking does.
pub async fn submit_interest(
    State(state): State<AppState>,
    RequireViewer(user): RequireViewer,
    Form(form): Form<InterestForm>,
) -> AppResult<Response> {
    let result = mark_interested(&state, &user, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &user, submission.status, Some(submission.notice)).await
}

async fn mark_interested(
    state: &AppState,
    user: &SessionUser,
    form: InterestForm,
) -> AppResult<String> {
    if form.action != "mark_interested" {
        return Err(unknown_action(&form.action).into());
    }
    let movie_id = input::parse_id("Movie", &form.movie_id)?;
    let movie = MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        })?;

    let input = CreateRecommendation {
        user_id: user.user_id,
        movie_id,
        reason: REASON_INTERESTED.to_string(),
    };
    RecommendationRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, movie_id, "Interest recorded");

    Ok(format!("Noted your interest in {}", movie.title))
}

async fn render_page(
    state: &AppState,
    user: &SessionUser,
    status: StatusCode,
    notice: Option<Notice>,
) -> AppResult<Response> {
    let personalised = !RecommendationRepo::history_for_user(&state.pool, user.user_id)
        .await?
        .is_empty();
    let movies = RecommendationRepo::recommend_for_user(&state.pool, user.user_id).await?;
    let catalog = MovieRepo::list(&state.pool).await?;

    let page = RecommendationsPage {
        layout: Layout::for_user(user).with_notice(notice),
        personalised,
        movies,
        catalog,
    };
    render_with_status(status, &page)
}
