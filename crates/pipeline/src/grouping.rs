//! Per-genre leaderboards.
//!
//! A movie with several genres lands in several buckets; this is a
//! multi-membership partition, not a strict one. Genre names are matched
//! exactly as the enrichment step produced them.

use std::collections::BTreeMap;

use catalog::MovieSummary;
use tracing::debug;

use crate::enrichment::rank_by_score;

/// Default number of movies kept per genre
pub const DEFAULT_BUCKET_SIZE: usize = 10;

/// Genre name -> that genre's top movies, iterated in genre-name order
pub type GenreBuckets = BTreeMap<String, Vec<MovieSummary>>;

/// Groups summaries by genre and keeps the best of each.
///
/// ## Algorithm
/// 1. Walk the movies in input order
/// 2. Append each movie to the bucket of every genre it carries
/// 3. Stable-sort every bucket by score, highest first
/// 4. Truncate every bucket to `bucket_size`
#[derive(Debug, Clone, Copy)]
pub struct GenreGrouping {
    bucket_size: usize,
}

impl GenreGrouping {
    pub fn new(bucket_size: usize) -> Self {
        Self { bucket_size }
    }

    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    pub fn group_by_genre(&self, movies: &[MovieSummary]) -> GenreBuckets {
        let mut buckets = GenreBuckets::new();
        for movie in movies {
            for genre in &movie.genres {
                buckets
                    .entry(genre.clone())
                    .or_insert_with(Vec::new)
                    .push(movie.clone());
            }
        }

        for bucket in buckets.values_mut() {
            rank_by_score(bucket);
            bucket.truncate(self.bucket_size);
        }

        debug!(
            "Grouped {} movies into {} genre buckets",
            movies.len(),
            buckets.len()
        );
        buckets
    }
}

impl Default for GenreGrouping {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_SIZE)
    }
}

/// Group with the default bucket size of ten
pub fn group_by_genre(movies: &[MovieSummary]) -> GenreBuckets {
    GenreGrouping::default().group_by_genre(movies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64, score: f64, genres: &[&str]) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_url: String::new(),
            score_average: score,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_multi_membership() {
        let movies = vec![summary(1, 7.0, &["Action", "Adventure"])];
        let buckets = group_by_genre(&movies);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets["Action"][0].id, 1);
        assert_eq!(buckets["Adventure"][0].id, 1);
    }

    #[test]
    fn test_bucket_sorted_and_bounded() {
        let movies: Vec<MovieSummary> = (0..25)
            .map(|i| summary(i, (i % 7) as f64, &["Drama"]))
            .collect();
        let buckets = group_by_genre(&movies);

        let drama = &buckets["Drama"];
        assert_eq!(drama.len(), DEFAULT_BUCKET_SIZE);
        for pair in drama.windows(2) {
            assert!(pair[0].score_average >= pair[1].score_average);
        }
        // Three movies score 6.0 (ids 6, 13, 20), then 5.0 (5, 12, 19), ...
        let ids: Vec<u64> = drama.iter().take(4).map(|m| m.id).collect();
        assert_eq!(ids, vec![6, 13, 20, 5]);
    }

    #[test]
    fn test_genre_names_case_sensitive() {
        let movies = vec![
            summary(1, 5.0, &["Sci-Fi"]),
            summary(2, 6.0, &["sci-fi"]),
        ];
        let buckets = group_by_genre(&movies);
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn test_custom_bucket_size() {
        let movies = vec![
            summary(1, 5.0, &["Comedy"]),
            summary(2, 9.0, &["Comedy"]),
            summary(3, 7.0, &["Comedy"]),
        ];
        let buckets = GenreGrouping::new(2).group_by_genre(&movies);
        let ids: Vec<u64> = buckets["Comedy"].iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_movies_without_genres_are_dropped() {
        let movies = vec![summary(1, 5.0, &[])];
        assert!(group_by_genre(&movies).is_empty());
    }
}
