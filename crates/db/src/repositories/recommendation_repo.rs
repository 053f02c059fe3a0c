//! Repository for the `recommendations` table.
//!
//! The table doubles as the activity log that seeds recommendations; id
//! order stands in for time.

use cinestream_core::recommendation::{RecommendationSeed, RECOMMENDATION_LIMIT};
use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::Movie;
use crate::models::recommendation::{
    ActivityEntry, CreateRecommendation, Recommendation, RecommendationDetail,
    UpdateRecommendation,
};
use crate::repositories::movie_repo::COLUMNS as MOVIE_COLUMNS;
use crate::repositories::MovieRepo;

const COLUMNS: &str = "id, user_id, movie_id, reason";

const DETAIL_SELECT: &str = "SELECT r.id, r.user_id, u.name AS user_name, \
        r.movie_id, m.title AS movie_title, m.genre, r.reason \
     FROM recommendations r \
     JOIN users u ON u.id = r.user_id \
     JOIN movies m ON m.id = r.movie_id";

/// Provides CRUD operations and the recommendation query.
pub struct RecommendationRepo;

impl RecommendationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateRecommendation,
    ) -> Result<Recommendation, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let row = Self::insert(&mut tx, input).await?;
        tx.commit().await?;
        Ok(row)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Recommendation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recommendations WHERE id = $1");
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every activity row, newest first.
    pub async fn list_detailed(pool: &PgPool) -> Result<Vec<RecommendationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY r.id DESC");
        sqlx::query_as::<_, RecommendationDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// The most recent activity rows across all users.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<RecommendationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY r.id DESC LIMIT $1");
        sqlx::query_as::<_, RecommendationDetail>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// `(movie_id, genre)` for every activity row of a user, oldest first.
    pub async fn history_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        sqlx::query_as::<_, ActivityEntry>(
            "SELECT r.movie_id, m.genre \
             FROM recommendations r \
             JOIN movies m ON m.id = r.movie_id \
             WHERE r.user_id = $1 \
             ORDER BY r.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Top-rated movies sharing a genre with `seed`, excluding seen movies.
    ///
    /// Both lists are bound as arrays, so their length never changes the
    /// statement text.
    pub async fn matching_seed(
        pool: &PgPool,
        seed: &RecommendationSeed,
        limit: i64,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies
             WHERE genre = ANY($1) AND NOT (id = ANY($2))
             ORDER BY rating DESC, title ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&seed.genres)
            .bind(&seed.seen_movie_ids)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Recommendations for a user.
    ///
    /// With activity history: genre-overlap matches (see [`Self::matching_seed`]).
    /// Without: the global top-rated movies.
    pub async fn recommend_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let history = Self::history_for_user(pool, user_id).await?;
        let seed = RecommendationSeed::from_history(
            history.iter().map(|e| (e.movie_id, e.genre.as_str())),
        );

        if seed.is_empty() {
            MovieRepo::list_top_rated(pool, RECOMMENDATION_LIMIT).await
        } else {
            Self::matching_seed(pool, &seed, RECOMMENDATION_LIMIT).await
        }
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRecommendation,
    ) -> Result<Option<Recommendation>, sqlx::Error> {
        let query = format!(
            "UPDATE recommendations SET
                movie_id = COALESCE($2, movie_id),
                reason = COALESCE($3, reason)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(id)
            .bind(input.movie_id)
            .bind(&input.reason)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recommendations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateRecommendation,
    ) -> Result<Recommendation, sqlx::Error> {
        let query = format!(
            "INSERT INTO recommendations (user_id, movie_id, reason)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(input.user_id)
            .bind(input.movie_id)
            .bind(&input.reason)
            .fetch_one(&mut **tx)
            .await
    }
}
