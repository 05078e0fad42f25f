//! Enrichment: search results joined with genre names, ranked by score.
//!
//! ## Algorithm
//! 1. Run the search (or top-rated listing) against the catalog
//! 2. For each raw result, in catalog order, resolve its genre ids to names
//! 3. Build one `MovieSummary` per result
//! 4. Stable-sort the summaries by `score_average`, highest first
//!
//! A failed search degrades to an empty list. A failed genre resolution
//! aborts the whole aggregation, since genre names are required fields.

use std::sync::Arc;
use std::time::Instant;

use catalog::{CatalogError, CatalogService, MovieSummary, RawSearchResult, Result};
use tracing::{debug, info, warn};

/// Builds ranked `MovieSummary` lists from catalog searches.
///
/// ## Usage
/// ```ignore
/// let pipeline = EnrichmentPipeline::new(catalog.clone()).with_result_limit(16);
/// let movies = pipeline.aggregate("thor", None).await?;
/// ```
#[derive(Clone)]
pub struct EnrichmentPipeline {
    catalog: Arc<dyn CatalogService>,
    result_limit: Option<usize>,
}

impl EnrichmentPipeline {
    /// Create a pipeline over the given catalog, with no result limit.
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            result_limit: None,
        }
    }

    /// Only enrich the first `limit` raw results, in catalog order.
    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = Some(limit);
        self
    }

    pub fn result_limit(&self) -> Option<usize> {
        self.result_limit
    }

    /// Search the catalog and return enriched, ranked summaries.
    ///
    /// # Arguments
    /// * `query` - Free-text search, must not be blank
    /// * `genre_filter` - Passed through to the catalog untouched
    ///
    /// # Returns
    /// * `Ok(Vec<MovieSummary>)` - Sorted by score, possibly empty when the
    ///   search matched nothing or the catalog was unavailable
    /// * `Err` - Blank query, or genre resolution failed for some movie
    pub async fn aggregate(
        &self,
        query: &str,
        genre_filter: Option<&str>,
    ) -> Result<Vec<MovieSummary>> {
        if query.trim().is_empty() {
            return Err(CatalogError::InvalidQuery(
                "search query must not be blank".to_string(),
            ));
        }

        let start = Instant::now();
        debug!(query, genre_filter, catalog = self.catalog.name(), "Searching catalog");

        let raw = match self.catalog.search(query, genre_filter).await {
            Ok(results) => results,
            Err(err) => {
                warn!(query, error = %err, "Search failed, returning no results");
                return Ok(Vec::new());
            }
        };

        let summaries = self.enrich(raw).await?;
        info!(
            "Aggregated {} movies for '{}' in {:.2?}",
            summaries.len(),
            query,
            start.elapsed()
        );
        Ok(summaries)
    }

    /// Same join and ranking as [`aggregate`](Self::aggregate), over the
    /// catalog's top-rated listing instead of a search.
    pub async fn aggregate_top_rated(
        &self,
        genre_filter: Option<&str>,
    ) -> Result<Vec<MovieSummary>> {
        let start = Instant::now();

        let raw = match self.catalog.top_rated(genre_filter).await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "Top-rated listing failed, returning no results");
                return Ok(Vec::new());
            }
        };

        let summaries = self.enrich(raw).await?;
        info!(
            "Aggregated {} top-rated movies in {:.2?}",
            summaries.len(),
            start.elapsed()
        );
        Ok(summaries)
    }

    /// Resolve genres for each raw result, one catalog call per movie.
    async fn enrich(&self, mut raw: Vec<RawSearchResult>) -> Result<Vec<MovieSummary>> {
        if let Some(limit) = self.result_limit {
            raw.truncate(limit);
        }

        let mut summaries = Vec::with_capacity(raw.len());
        for result in &raw {
            let genres = self
                .catalog
                .genre_names(&result.genre_ids)
                .await
                .inspect_err(|err| {
                    warn!(
                        movie_id = result.id,
                        error = %err,
                        "Genre resolution failed, aborting aggregation"
                    );
                })?;

            // A short or long genre list is a resolution failure, not a bad record
            match MovieSummary::from_raw(result, genres) {
                Ok(summary) => summaries.push(summary),
                Err(err @ CatalogError::GenreCountMismatch { .. }) => {
                    warn!(
                        movie_id = result.id,
                        error = %err,
                        "Genre resolution incomplete, aborting aggregation"
                    );
                    return Err(err);
                }
                Err(err) => {
                    warn!(movie_id = result.id, error = %err, "Skipping malformed search result");
                }
            }
        }

        rank_by_score(&mut summaries);
        Ok(summaries)
    }
}

/// Stable sort by `score_average`, highest first.
///
/// Equal scores keep their relative input order.
pub fn rank_by_score(movies: &mut [MovieSummary]) {
    movies.sort_by(|a, b| b.score_average.total_cmp(&a.score_average));
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog::{
        Endpoint, GenreCatalog, GenreId, InMemoryCatalog, MovieDetails, MovieId, Video,
    };
    use std::collections::HashMap;

    fn raw(id: u64, title: &str, score: f64, genre_ids: Vec<u32>) -> RawSearchResult {
        RawSearchResult {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            vote_average: score,
            genre_ids,
        }
    }

    fn create_test_catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_genre(28, "Action");
        catalog.insert_genre(12, "Adventure");
        catalog.insert_genre(14, "Fantasy");
        catalog.insert_movie(raw(1, "Thor", 6.8, vec![28, 12, 14]));
        catalog.insert_movie(raw(2, "Thor: Ragnarok", 7.6, vec![28, 12]));
        catalog.insert_movie(raw(3, "Thor: The Dark World", 6.8, vec![28]));
        catalog.insert_movie(raw(4, "Thor: Love and Thunder", 6.4, vec![14]));
        catalog
    }

    #[tokio::test]
    async fn test_aggregate_sorted_descending() {
        let pipeline = EnrichmentPipeline::new(Arc::new(create_test_catalog()));
        let movies = pipeline.aggregate("thor", None).await.unwrap();

        assert_eq!(movies.len(), 4);
        for pair in movies.windows(2) {
            assert!(pair[0].score_average >= pair[1].score_average);
        }
    }

    #[tokio::test]
    async fn test_aggregate_ties_keep_search_order() {
        let pipeline = EnrichmentPipeline::new(Arc::new(create_test_catalog()));
        let movies = pipeline.aggregate("thor", None).await.unwrap();

        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        // 1 and 3 share 6.8; 1 came first in the search results
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[tokio::test]
    async fn test_genre_count_matches_ids() {
        let pipeline = EnrichmentPipeline::new(Arc::new(create_test_catalog()));
        let movies = pipeline.aggregate("thor", None).await.unwrap();

        let thor = movies.iter().find(|m| m.id == 1).unwrap();
        assert_eq!(thor.genres, vec!["Action", "Adventure", "Fantasy"]);

        let expected: HashMap<u64, usize> = [(1, 3), (2, 2), (3, 1), (4, 1)].into_iter().collect();
        assert_eq!(movies.len(), expected.len());
        for movie in &movies {
            assert_eq!(movie.genres.len(), expected[&movie.id], "movie {}", movie.id);
        }
    }

    /// Delegates to an in-memory catalog but drops the last resolved genre name
    struct ShortGenreCatalog {
        inner: InMemoryCatalog,
    }

    #[async_trait]
    impl CatalogService for ShortGenreCatalog {
        fn name(&self) -> &str {
            "short-genres"
        }

        async fn search(
            &self,
            query: &str,
            genre_filter: Option<&str>,
        ) -> Result<Vec<RawSearchResult>> {
            self.inner.search(query, genre_filter).await
        }

        async fn top_rated(&self, genre_filter: Option<&str>) -> Result<Vec<RawSearchResult>> {
            self.inner.top_rated(genre_filter).await
        }

        async fn movie_details(&self, id: MovieId) -> Result<MovieDetails> {
            self.inner.movie_details(id).await
        }

        async fn movie_videos(&self, id: MovieId) -> Result<Vec<Video>> {
            self.inner.movie_videos(id).await
        }

        async fn genre_catalog(&self) -> Result<GenreCatalog> {
            self.inner.genre_catalog().await
        }

        async fn genre_names(&self, ids: &[GenreId]) -> Result<Vec<String>> {
            let mut names = self.inner.genre_names(ids).await?;
            names.pop();
            Ok(names)
        }
    }

    #[tokio::test]
    async fn test_short_genre_list_aborts_aggregation() {
        let mut inner = InMemoryCatalog::new();
        inner.insert_genre(28, "Action");
        inner.insert_genre(12, "Adventure");
        inner.insert_movie(raw(1, "Thor", 7.0, vec![28, 12]));
        inner.insert_movie(raw(2, "Thor: Ragnarok", 7.6, vec![]));
        let pipeline = EnrichmentPipeline::new(Arc::new(ShortGenreCatalog { inner }));

        let err = pipeline.aggregate("thor", None).await.unwrap_err();
        assert_eq!(
            err,
            CatalogError::GenreCountMismatch {
                movie_id: 1,
                expected: 2,
                found: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_one_genre_call_per_movie() {
        let catalog = Arc::new(create_test_catalog());
        let pipeline = EnrichmentPipeline::new(catalog.clone());
        pipeline.aggregate("thor", None).await.unwrap();

        assert_eq!(catalog.calls(Endpoint::Search), 1);
        assert_eq!(catalog.calls(Endpoint::GenreList), 4);
    }

    #[tokio::test]
    async fn test_search_failure_degrades_to_empty() {
        let mut catalog = create_test_catalog();
        catalog.fail(Endpoint::Search, 503);
        let pipeline = EnrichmentPipeline::new(Arc::new(catalog));

        let movies = pipeline.aggregate("thor", None).await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_genre_failure_aborts_aggregation() {
        let mut catalog = create_test_catalog();
        catalog.fail_after(Endpoint::GenreList, 500, 2);
        let pipeline = EnrichmentPipeline::new(Arc::new(catalog));

        let err = pipeline.aggregate("thor", None).await.unwrap_err();
        assert!(err.is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_unknown_genre_aborts_aggregation() {
        let mut catalog = create_test_catalog();
        catalog.insert_movie(raw(5, "Thor Mystery", 9.0, vec![28, 9648]));
        let pipeline = EnrichmentPipeline::new(Arc::new(catalog));

        let err = pipeline.aggregate("thor", None).await.unwrap_err();
        assert_eq!(err, CatalogError::UnknownGenre { id: 9648 });
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let catalog = Arc::new(create_test_catalog());
        let pipeline = EnrichmentPipeline::new(catalog.clone());

        let err = pipeline.aggregate("  ", None).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidQuery(_)));
        assert_eq!(catalog.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_title_is_skipped() {
        let mut catalog = create_test_catalog();
        catalog.insert_movie(raw(6, "", 9.9, vec![28]));
        let pipeline = EnrichmentPipeline::new(Arc::new(catalog));

        let movies = pipeline.aggregate_top_rated(None).await.unwrap();
        assert_eq!(movies.len(), 4);
        assert!(movies.iter().all(|m| m.id != 6));
    }

    #[tokio::test]
    async fn test_result_limit_applies_before_enrichment() {
        let catalog = Arc::new(create_test_catalog());
        let pipeline = EnrichmentPipeline::new(catalog.clone()).with_result_limit(2);

        let movies = pipeline.aggregate("thor", None).await.unwrap();
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(catalog.calls(Endpoint::GenreList), 2);
    }

    #[tokio::test]
    async fn test_genre_filter_passed_through() {
        let pipeline = EnrichmentPipeline::new(Arc::new(create_test_catalog()));
        let movies = pipeline.aggregate("thor", Some("14")).await.unwrap();

        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_rank_by_score_is_stable() {
        let summary = |id: u64, score: f64| MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_url: String::new(),
            score_average: score,
            genres: vec![],
        };
        let mut movies = vec![summary(1, 5.0), summary(2, 7.0), summary(3, 5.0), summary(4, 7.0)];
        rank_by_score(&mut movies);

        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }
}
