//! Admin scheduling of showtimes.

use askama::Template;
use axum::extract::State;
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input;
use cinestream_core::types::DbId;
use cinestream_db::models::cinema::CinemaWithType;
use cinestream_db::models::movie::Movie;
use cinestream_db::models::showtime::{CreateShowtime, ShowtimeDetail};
use cinestream_db::repositories::{CinemaRepo, MovieRepo, ShowtimeRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::unknown_action;
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/showtimes`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowtimeForm {
    pub action: String,
    pub id: String,
    pub cinema_id: String,
    pub movie_id: String,
    pub show_date: String,
    pub show_time: String,
    pub capacity: String,
}

enum ShowtimeAction {
    Add(CreateShowtime),
    Delete(DbId),
}

impl ShowtimeForm {
    fn into_action(self) -> Result<ShowtimeAction, CoreError> {
        match self.action.as_str() {
            "add_showtime" => Ok(ShowtimeAction::Add(CreateShowtime {
                cinema_id: input::parse_id("Cinema", &self.cinema_id)?,
                movie_id: input::parse_id("Movie", &self.movie_id)?,
                show_date: input::parse_date("Show date", &self.show_date)?,
                show_time: input::parse_time("Show time", &self.show_time)?,
                capacity: input::parse_positive_int("Capacity", &self.capacity)?,
            })),
            "delete_showtime" => Ok(ShowtimeAction::Delete(input::parse_id(
                "Showtime",
                &self.id,
            )?)),
            other => Err(unknown_action(other)),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/showtimes.html")]
struct AdminShowtimesPage {
    layout: Layout,
    showtimes: Vec<ShowtimeDetail>,
    cinemas: Vec<CinemaWithType>,
    movies: Vec<Movie>,
}

/// GET /admin/showtimes
pub async fn showtimes_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Response> {
    render_page(&state, &admin, None).await
}

/// POST /admin/showtimes
pub async fn submit_showtime(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ShowtimeForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission)).await
}

async fn apply(state: &AppState, admin: &SessionUser, form: ShowtimeForm) -> AppResult<String> {
    match form.into_action()? {
        ShowtimeAction::Add(input) => {
            let showtime = ShowtimeRepo::create(&state.pool, &input).await?;
            tracing::info!(
                admin_id = admin.user_id,
                showtime_id = showtime.id,
                cinema_id = showtime.cinema_id,
                movie_id = showtime.movie_id,
                "Showtime scheduled"
            );
            Ok(format!(
                "Showtime scheduled for {} at {}",
                showtime.show_date,
                showtime.show_time.format("%H:%M")
            ))
        }
        ShowtimeAction::Delete(id) => {
            if !ShowtimeRepo::delete(&state.pool, id).await? {
                return Err(CoreError::NotFound {
                    entity: "Showtime",
                    id,
                }
                .into());
            }
            tracing::info!(admin_id = admin.user_id, showtime_id = id, "Showtime deleted");
            Ok(format!("Showtime {id} deleted"))
        }
    }
}

async fn render_page(
    state: &AppState,
    admin: &SessionUser,
    submission: Option<Submission>,
) -> AppResult<Response> {
    let (status, notice) = Submission::into_parts(submission);
    let page = AdminShowtimesPage {
        layout: Layout::for_user(admin).with_notice(notice),
        showtimes: ShowtimeRepo::list_detailed(&state.pool).await?,
        cinemas: CinemaRepo::list_with_types(&state.pool).await?,
        movies: MovieRepo::list(&state.pool).await?,
    };
    render_with_status(status, &page)
}
