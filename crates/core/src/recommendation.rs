//! Genre-overlap recommendation heuristic.
//!
//! The activity log (the `recommendations` table) is folded into a
//! [`RecommendationSeed`]: the genres the user has touched and the movies
//! they have already seen. The database layer turns the seed into a single
//! query; with an empty seed it falls back to the global top-rated list.

use crate::types::DbId;

/// Maximum number of movies returned by one recommendation query.
pub const RECOMMENDATION_LIMIT: i64 = 10;

/// Activity reason recorded when a viewer books a ticket.
pub const REASON_BOOKED: &str = "Booked a ticket";

/// Activity reason recorded when a viewer marks a movie as interesting.
pub const REASON_INTERESTED: &str = "Marked as interested";

/// Inputs to the recommendation query derived from a user's history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationSeed {
    /// Distinct genres, in first-seen order.
    pub genres: Vec<String>,
    /// Distinct movie ids the user already interacted with.
    pub seen_movie_ids: Vec<DbId>,
}

impl RecommendationSeed {
    /// Build a seed from `(movie_id, genre)` history pairs.
    ///
    /// Blank genres are ignored for matching but the movie still counts as
    /// seen.
    pub fn from_history<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = (DbId, &'a str)>,
    {
        let mut seed = Self::default();
        for (movie_id, genre) in history {
            if !seed.seen_movie_ids.contains(&movie_id) {
                seed.seen_movie_ids.push(movie_id);
            }
            let genre = genre.trim();
            if !genre.is_empty() && !seed.genres.iter().any(|g| g == genre) {
                seed.genres.push(genre.to_string());
            }
        }
        seed
    }

    /// True when there is no history to personalize from.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.seen_movie_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_gives_empty_seed() {
        let seed = RecommendationSeed::from_history(Vec::<(DbId, &str)>::new());
        assert!(seed.is_empty());
    }

    #[test]
    fn deduplicates_genres_and_movies() {
        let seed = RecommendationSeed::from_history([
            (1, "Action"),
            (2, "Comedy"),
            (1, "Action"),
            (3, "Action"),
        ]);
        assert_eq!(seed.genres, vec!["Action", "Comedy"]);
        assert_eq!(seed.seen_movie_ids, vec![1, 2, 3]);
        assert!(!seed.is_empty());
    }

    #[test]
    fn blank_genre_still_marks_movie_seen() {
        let seed = RecommendationSeed::from_history([(7, "  ")]);
        assert!(seed.genres.is_empty());
        assert_eq!(seed.seen_movie_ids, vec![7]);
        assert!(!seed.is_empty());
    }
}
