//! Catalog detail pages: preference-aware movie sections, cinema schedules,
//! platform listings and missing ids.

mod common;

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use common::{body_text, create_user, get_with_cookie, login, TEST_PASSWORD};
use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_db::models::cinema::{CreateCinema, CreateCinemaType};
use cinestream_db::models::movie::CreateMovie;
use cinestream_db::models::platform::{CreatePlatform, CreateStreamingService};
use cinestream_db::models::showtime::CreateShowtime;
use cinestream_db::repositories::{
    CinemaRepo, CinemaTypeRepo, MovieRepo, PlatformRepo, ShowtimeRepo, StreamingServiceRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Catalog {
    movie_id: i64,
    cinema_id: i64,
    platform_id: i64,
}

/// One movie showing at one cinema and streaming on one platform.
async fn seed(pool: &PgPool) -> Catalog {
    let movie = MovieRepo::create(
        pool,
        &CreateMovie {
            title: "Arrival".to_string(),
            genre: "Sci-Fi".to_string(),
            release_date: NaiveDate::from_ymd_opt(2016, 11, 11).unwrap(),
            language: "English".to_string(),
            duration_mins: 116,
            rating: 7.9,
        },
    )
    .await
    .unwrap();
    let cinema_type = CinemaTypeRepo::create(
        pool,
        &CreateCinemaType {
            type_name: "Dolby".to_string(),
            price_cents: 1475,
        },
    )
    .await
    .unwrap();
    let cinema = CinemaRepo::create(
        pool,
        &CreateCinema {
            name: "Riverside".to_string(),
            location: "Harbour Street".to_string(),
            type_id: cinema_type.id,
        },
    )
    .await
    .unwrap();
    ShowtimeRepo::create(
        pool,
        &CreateShowtime {
            cinema_id: cinema.id,
            movie_id: movie.id,
            show_date: NaiveDate::from_ymd_opt(2099, 6, 1).unwrap(),
            show_time: NaiveTime::from_hms_opt(18, 45, 0).unwrap(),
            capacity: 40,
        },
    )
    .await
    .unwrap();
    let platform = PlatformRepo::create(
        pool,
        &CreatePlatform {
            platform_name: "StreamBox".to_string(),
            website: "https://streambox.example".to_string(),
        },
    )
    .await
    .unwrap();
    StreamingServiceRepo::create(
        pool,
        &CreateStreamingService {
            movie_id: movie.id,
            platform_id: platform.id,
            price_720p_cents: 299,
            price_1080p_cents: 399,
            price_4k_cents: 599,
        },
    )
    .await
    .unwrap();

    Catalog {
        movie_id: movie.id,
        cinema_id: cinema.id,
        platform_id: platform.id,
    }
}

async fn viewer_with(pool: &PgPool, email: &str, preference: Preference) -> String {
    create_user(pool, email, Role::Viewer, preference).await;
    login(common::build_test_app(pool.clone()), email, TEST_PASSWORD).await
}

// ---------------------------------------------------------------------------
// Movie detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cinema_preference_shows_showtimes_only(pool: PgPool) {
    let catalog = seed(&pool).await;
    let cookie = viewer_with(&pool, "cinephile@test.com", Preference::Cinema).await;

    let response = get_with_cookie(
        common::build_test_app(pool),
        &format!("/movies/{}", catalog.movie_id),
        &cookie,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<h2>In cinemas</h2>"));
    assert!(body.contains("Riverside"));
    assert!(body.contains("14.75"));
    assert!(body.contains("18:45"));
    assert!(!body.contains("<h2>Streaming</h2>"));
    assert!(!body.contains("StreamBox"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn streaming_preference_shows_platform_prices_only(pool: PgPool) {
    let catalog = seed(&pool).await;
    let cookie = viewer_with(&pool, "couch@test.com", Preference::Streaming).await;

    let response = get_with_cookie(
        common::build_test_app(pool),
        &format!("/movies/{}", catalog.movie_id),
        &cookie,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<h2>Streaming</h2>"));
    assert!(body.contains("StreamBox"));
    assert!(body.contains("5.99"));
    assert!(!body.contains("<h2>In cinemas</h2>"));
    assert!(!body.contains("Riverside"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn both_preference_shows_both_sections(pool: PgPool) {
    let catalog = seed(&pool).await;
    let cookie = viewer_with(&pool, "everything@test.com", Preference::Both).await;

    let response = get_with_cookie(
        common::build_test_app(pool),
        &format!("/movies/{}", catalog.movie_id),
        &cookie,
    )
    .await;

    let body = body_text(response).await;
    assert!(body.contains("<h2>In cinemas</h2>"));
    assert!(body.contains("<h2>Streaming</h2>"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_movie_renders_warning_with_404(pool: PgPool) {
    let cookie = viewer_with(&pool, "lost@test.com", Preference::Both).await;

    let response = get_with_cookie(common::build_test_app(pool), "/movies/4242", &cookie).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_text(response).await;
    assert!(body.contains("Movie with id 4242 not found"));
    assert!(body.contains("Back to all movies"));
}

// ---------------------------------------------------------------------------
// Cinema and platform detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cinema_detail_lists_upcoming_showtimes(pool: PgPool) {
    let catalog = seed(&pool).await;
    let cookie = viewer_with(&pool, "local@test.com", Preference::Cinema).await;

    let response = get_with_cookie(
        common::build_test_app(pool),
        &format!("/cinemas/{}", catalog.cinema_id),
        &cookie,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Riverside"));
    assert!(body.contains("Harbour Street"));
    assert!(body.contains("Dolby"));
    assert!(body.contains("Arrival"));
    assert!(body.contains("2099-06-01"));
    assert!(body.contains("40"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_cinema_is_404(pool: PgPool) {
    let cookie = viewer_with(&pool, "nocinema@test.com", Preference::Cinema).await;

    let response = get_with_cookie(common::build_test_app(pool), "/cinemas/777", &cookie).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response)
        .await
        .contains("Cinema with id 777 not found"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn platform_detail_lists_movies_and_prices(pool: PgPool) {
    let catalog = seed(&pool).await;
    let cookie = viewer_with(&pool, "binge@test.com", Preference::Streaming).await;

    let response = get_with_cookie(
        common::build_test_app(pool),
        &format!("/platforms/{}", catalog.platform_id),
        &cookie,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("StreamBox"));
    assert!(body.contains("Arrival"));
    assert!(body.contains("2.99"));
    assert!(body.contains("3.99"));
    assert!(body.contains("5.99"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_platform_is_404(pool: PgPool) {
    let cookie = viewer_with(&pool, "noplatform@test.com", Preference::Streaming).await;

    let response = get_with_cookie(common::build_test_app(pool), "/platforms/31", &cookie).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response)
        .await
        .contains("Platform with id 31 not found"));
}
