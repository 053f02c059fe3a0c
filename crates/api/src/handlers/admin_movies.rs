//! Admin management of the movie catalog.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::types::DbId;
use cinestream_db::models::movie::{CreateMovie, Movie, UpdateMovie};
use cinestream_db::repositories::MovieRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{unknown_action, EditQuery};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/movies`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieForm {
    pub action: String,
    pub id: String,
    pub title: String,
    pub genre: String,
    pub release_date: String,
    pub language: String,
    pub duration_mins: String,
    pub rating: String,
}

enum MovieAction {
    Add(CreateMovie),
    Edit(DbId, UpdateMovie),
    Delete(DbId),
}

impl MovieForm {
    fn into_action(self) -> Result<MovieAction, CoreError> {
        match self.action.as_str() {
            "add_movie" => Ok(MovieAction::Add(CreateMovie {
                title: input::required_text("Title", &self.title, MAX_TEXT_LENGTH)?,
                genre: input::required_text("Genre", &self.genre, MAX_TEXT_LENGTH)?,
                release_date: input::parse_date("Release date", &self.release_date)?,
                language: input::required_text("Language", &self.language, MAX_TEXT_LENGTH)?,
                duration_mins: input::parse_duration(&self.duration_mins)?,
                rating: input::parse_rating(&self.rating)?,
            })),
            "edit_movie" => Ok(MovieAction::Edit(
                input::parse_id("Movie", &self.id)?,
                UpdateMovie {
                    title: input::optional(&self.title, |v| {
                        input::required_text("Title", v, MAX_TEXT_LENGTH)
                    })?,
                    genre: input::optional(&self.genre, |v| {
                        input::required_text("Genre", v, MAX_TEXT_LENGTH)
                    })?,
                    release_date: input::optional(&self.release_date, |v| {
                        input::parse_date("Release date", v)
                    })?,
                    language: input::optional(&self.language, |v| {
                        input::required_text("Language", v, MAX_TEXT_LENGTH)
                    })?,
                    duration_mins: input::optional(&self.duration_mins, input::parse_duration)?,
                    rating: input::optional(&self.rating, input::parse_rating)?,
                },
            )),
            "delete_movie" => Ok(MovieAction::Delete(input::parse_id("Movie", &self.id)?)),
            other => Err(unknown_action(other)),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/movies.html")]
struct AdminMoviesPage {
    layout: Layout,
    movies: Vec<Movie>,
    editing: Option<Movie>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Movie", id }
}

/// GET /admin/movies
pub async fn movies_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<EditQuery>,
) -> AppResult<Response> {
    render_page(&state, &admin, None, query.id()).await
}

/// POST /admin/movies
pub async fn submit_movie(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<MovieForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission), None).await
}

async fn apply(state: &AppState, admin: &SessionUser, form: MovieForm) -> AppResult<String> {
    match form.into_action()? {
        MovieAction::Add(input) => {
            let movie = MovieRepo::create(&state.pool, &input).await?;
            tracing::info!(admin_id = admin.user_id, movie_id = movie.id, "Movie added");
            Ok(format!("Movie \"{}\" added", movie.title))
        }
        MovieAction::Edit(id, input) => {
            let movie = MovieRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| not_found(id))?;
            tracing::info!(admin_id = admin.user_id, movie_id = id, "Movie updated");
            Ok(format!("Movie \"{}\" updated", movie.title))
        }
        MovieAction::Delete(id) => {
            if !MovieRepo::delete(&state.pool, id).await? {
                return Err(not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, movie_id = id, "Movie deleted");
            Ok(format!("Movie {id} deleted"))
        }
    }
}

async fn render_page(
    state: &AppState,
    admin: &SessionUser,
    submission: Option<Submission>,
    edit_id: Option<DbId>,
) -> AppResult<Response> {
    let (mut status, mut notice) = Submission::into_parts(submission);

    let editing = match edit_id {
        Some(id) => {
            let movie = MovieRepo::find_by_id(&state.pool, id).await?;
            if movie.is_none() {
                let missing = Submission::missing(not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            movie
        }
        None => None,
    };

    let page = AdminMoviesPage {
        layout: Layout::for_user(admin).with_notice(notice),
        movies: MovieRepo::list(&state.pool).await?,
        editing,
    };
    render_with_status(status, &page)
}
