//! Integration tests for the genre-overlap recommendation query.

use chrono::NaiveDate;
use cinestream_core::preference::Preference;
use cinestream_core::recommendation::RECOMMENDATION_LIMIT;
use cinestream_core::roles::Role;
use cinestream_db::models::movie::{CreateMovie, Movie};
use cinestream_db::models::recommendation::CreateRecommendation;
use cinestream_db::models::user::CreateUser;
use cinestream_db::repositories::{MovieRepo, RecommendationRepo, UserRepo};
use sqlx::PgPool;

async fn movie(pool: &PgPool, title: &str, genre: &str, rating: f64) -> Movie {
    MovieRepo::create(
        pool,
        &CreateMovie {
            title: title.to_string(),
            genre: genre.to_string(),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            language: "English".to_string(),
            duration_mins: 100,
            rating,
        },
    )
    .await
    .unwrap()
}

async fn viewer(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Fan".to_string(),
            age: None,
            email: "fan@test.com".to_string(),
            password_hash: "hash".to_string(),
            preference: Preference::Both,
            role: Role::Viewer,
        },
    )
    .await
    .unwrap()
    .id
}

async fn log(pool: &PgPool, user_id: i64, movie_id: i64) {
    RecommendationRepo::create(
        pool,
        &CreateRecommendation {
            user_id,
            movie_id,
            reason: "Marked as interested".to_string(),
        },
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn without_history_falls_back_to_top_rated(pool: PgPool) {
    let user_id = viewer(&pool).await;
    movie(&pool, "Low", "Drama", 5.0).await;
    movie(&pool, "High", "Comedy", 9.0).await;
    movie(&pool, "Mid", "Horror", 7.0).await;

    let picks = RecommendationRepo::recommend_for_user(&pool, user_id)
        .await
        .unwrap();

    let titles: Vec<_> = picks.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["High", "Mid", "Low"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_limits_to_seen_genres_and_excludes_seen_movies(pool: PgPool) {
    let user_id = viewer(&pool).await;
    let seen = movie(&pool, "Alien", "Sci-Fi", 8.5).await;
    movie(&pool, "Interstellar", "Sci-Fi", 8.7).await;
    movie(&pool, "Gravity", "Sci-Fi", 7.7).await;
    movie(&pool, "Heat", "Crime", 9.5).await;
    log(&pool, user_id, seen.id).await;

    let picks = RecommendationRepo::recommend_for_user(&pool, user_id)
        .await
        .unwrap();

    let titles: Vec<_> = picks.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Interstellar", "Gravity"]);
    assert!(picks.iter().all(|m| m.genre == "Sci-Fi" && m.id != seen.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn results_are_capped(pool: PgPool) {
    let user_id = viewer(&pool).await;
    let seen = movie(&pool, "Seed", "Action", 6.0).await;
    for i in 0..(RECOMMENDATION_LIMIT + 3) {
        movie(&pool, &format!("Action {i}"), "Action", 7.0).await;
    }
    log(&pool, user_id, seen.id).await;

    let picks = RecommendationRepo::recommend_for_user(&pool, user_id)
        .await
        .unwrap();

    assert_eq!(picks.len() as i64, RECOMMENDATION_LIMIT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn everything_seen_yields_empty_list(pool: PgPool) {
    let user_id = viewer(&pool).await;
    let only = movie(&pool, "Solo", "Western", 8.0).await;
    log(&pool, user_id, only.id).await;

    let picks = RecommendationRepo::recommend_for_user(&pool, user_id)
        .await
        .unwrap();

    assert!(picks.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recent_activity_is_newest_first(pool: PgPool) {
    let user_id = viewer(&pool).await;
    let first = movie(&pool, "First", "Drama", 7.0).await;
    let second = movie(&pool, "Second", "Drama", 7.0).await;
    log(&pool, user_id, first.id).await;
    log(&pool, user_id, second.id).await;

    let recent = RecommendationRepo::list_recent(&pool, 1).await.unwrap();

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].movie_title, "Second");
    assert_eq!(recent[0].user_name, "Fan");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unseen_movie_in_history_genre_is_recommended(pool: PgPool) {
    let user_id = viewer(&pool).await;
    let action_seen = movie(&pool, "Seen Action", "Action", 7.0).await;
    let comedy_seen = movie(&pool, "Seen Comedy", "Comedy", 6.5).await;
    let fresh = movie(&pool, "Fresh Action", "Action", 8.5).await;
    movie(&pool, "Off Genre", "Horror", 9.9).await;
    log(&pool, user_id, action_seen.id).await;
    log(&pool, user_id, comedy_seen.id).await;

    let picks = RecommendationRepo::recommend_for_user(&pool, user_id)
        .await
        .unwrap();

    let ids: Vec<_> = picks.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![fresh.id]);
    assert!(!ids.contains(&action_seen.id));
    assert!(!ids.contains(&comedy_seen.id));
}
