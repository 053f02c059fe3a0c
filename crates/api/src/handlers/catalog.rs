//! Read-only catalog pages: movies, cinemas and streaming platforms.
//!
//! Open to any signed-in user. Detail pages for an unknown id render the
//! page shell with a warning and a 404 status.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use cinestream_core::error::CoreError;
use cinestream_core::types::DbId;
use cinestream_db::models::cinema::CinemaWithType;
use cinestream_db::models::movie::Movie;
use cinestream_db::models::platform::{StreamingPlatform, StreamingServiceDetail};
use cinestream_db::models::showtime::ShowtimeDetail;
use cinestream_db::repositories::{
    CinemaRepo, MovieRepo, PlatformRepo, ShowtimeRepo, StreamingServiceRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::middleware::auth::SessionUser;
use crate::response::{render_with_status, Layout, Notice};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "movies.html")]
struct MoviesPage {
    layout: Layout,
    movies: Vec<Movie>,
}

#[derive(Template)]
#[template(path = "movie_detail.html")]
struct MovieDetailPage {
    layout: Layout,
    movie: Option<Movie>,
    showtimes: Vec<ShowtimeDetail>,
    services: Vec<StreamingServiceDetail>,
}

#[derive(Template)]
#[template(path = "cinemas.html")]
struct CinemasPage {
    layout: Layout,
    cinemas: Vec<CinemaWithType>,
}

#[derive(Template)]
#[template(path = "cinema_detail.html")]
struct CinemaDetailPage {
    layout: Layout,
    cinema: Option<CinemaWithType>,
    showtimes: Vec<ShowtimeDetail>,
}

#[derive(Template)]
#[template(path = "platforms.html")]
struct PlatformsPage {
    layout: Layout,
    platforms: Vec<StreamingPlatform>,
}

#[derive(Template)]
#[template(path = "platform_detail.html")]
struct PlatformDetailPage {
    layout: Layout,
    platform: Option<StreamingPlatform>,
    services: Vec<StreamingServiceDetail>,
}

/// Status and warning for a detail page whose entity is missing.
fn missing(entity: &'static str, id: DbId) -> (StatusCode, Option<Notice>) {
    let err = AppError::Core(CoreError::NotFound { entity, id });
    let (status, message) = err.status_and_message();
    (status, Some(Notice::warning(message)))
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

/// GET /movies
pub async fn list_movies(State(state): State<AppState>, user: SessionUser) -> AppResult<Response> {
    let movies = MovieRepo::list(&state.pool).await?;
    render_with_status(
        StatusCode::OK,
        &MoviesPage {
            layout: Layout::for_user(&user),
            movies,
        },
    )
}

/// GET /movies/{id}
///
/// Showtimes are listed when the user's preference includes cinema,
/// streaming prices when it includes streaming.
pub async fn movie_detail(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(movie) = MovieRepo::find_by_id(&state.pool, id).await? else {
        let (status, notice) = missing("Movie", id);
        let page = MovieDetailPage {
            layout: Layout::for_user(&user).with_notice(notice),
            movie: None,
            showtimes: Vec::new(),
            services: Vec::new(),
        };
        return render_with_status(status, &page);
    };

    let showtimes = if user.shows_cinema() {
        ShowtimeRepo::list_for_movie(&state.pool, id, today()).await?
    } else {
        Vec::new()
    };
    let services = if user.shows_streaming() {
        StreamingServiceRepo::list_for_movie(&state.pool, id).await?
    } else {
        Vec::new()
    };

    let page = MovieDetailPage {
        layout: Layout::for_user(&user),
        movie: Some(movie),
        showtimes,
        services,
    };
    render_with_status(StatusCode::OK, &page)
}

// ---------------------------------------------------------------------------
// Cinemas
// ---------------------------------------------------------------------------

/// GET /cinemas
pub async fn list_cinemas(State(state): State<AppState>, user: SessionUser) -> AppResult<Response> {
    let cinemas = CinemaRepo::list_with_types(&state.pool).await?;
    render_with_status(
        StatusCode::OK,
        &CinemasPage {
            layout: Layout::for_user(&user),
            cinemas,
        },
    )
}

/// GET /cinemas/{id}
pub async fn cinema_detail(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(cinema) = CinemaRepo::find_with_type(&state.pool, id).await? else {
        let (status, notice) = missing("Cinema", id);
        let page = CinemaDetailPage {
            layout: Layout::for_user(&user).with_notice(notice),
            cinema: None,
            showtimes: Vec::new(),
        };
        return render_with_status(status, &page);
    };

    let showtimes = ShowtimeRepo::list_for_cinema(&state.pool, id, today()).await?;
    let page = CinemaDetailPage {
        layout: Layout::for_user(&user),
        cinema: Some(cinema),
        showtimes,
    };
    render_with_status(StatusCode::OK, &page)
}

// ---------------------------------------------------------------------------
// Platforms
// ---------------------------------------------------------------------------

/// GET /platforms
pub async fn list_platforms(
    State(state): State<AppState>,
    user: SessionUser,
) -> AppResult<Response> {
    let platforms = PlatformRepo::list(&state.pool).await?;
    render_with_status(
        StatusCode::OK,
        &PlatformsPage {
            layout: Layout::for_user(&user),
            platforms,
        },
    )
}

/// GET /platforms/{id}
pub async fn platform_detail(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(platform) = PlatformRepo::find_by_id(&state.pool, id).await? else {
        let (status, notice) = missing("Platform", id);
        let page = PlatformDetailPage {
            layout: Layout::for_user(&user).with_notice(notice),
            platform: None,
            services: Vec::new(),
        };
        return render_with_status(status, &page);
    };

    let services = StreamingServiceRepo::list_for_platform(&state.pool, id).await?;
    let page = PlatformDetailPage {
        layout: Layout::for_user(&user),
        platform: Some(platform),
        services,
    };
    render_with_status(StatusCode::OK, &page)
}
