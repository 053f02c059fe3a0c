//! Route definitions for the read-only catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// ```text
/// GET /movies           -> list_movies
/// GET /movies/{id}      -> movie_detail
/// GET /cinemas          -> list_cinemas
/// GET /cinemas/{id}     -> cinema_detail
/// GET /platforms        -> list_platforms
/// GET /platforms/{id}   -> platform_detail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(catalog::list_movies))
        .route("/movies/{id}", get(catalog::movie_detail))
        .route("/cinemas", get(catalog::list_cinemas))
        .route("/cinemas/{id}", get(catalog::cinema_detail))
        .route("/platforms", get(catalog::list_platforms))
        .route("/platforms/{id}", get(catalog::platform_detail))
}
