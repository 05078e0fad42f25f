//! In-process catalog backend.
//!
//! `InMemoryCatalog` is filled through `insert_*` calls and then shared
//! behind an `Arc`. It can be told to fail individual endpoints with a
//! given status, optionally only after a number of successful calls, and
//! it counts every call it receives. The pipeline tests and benches run
//! against it instead of the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::genres::GenreCatalog;
use crate::service::CatalogService;
use crate::types::{Genre, GenreId, MovieDetails, MovieId, RawSearchResult, Video};

/// The individual catalog operations, for failure injection and call counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Search,
    TopRated,
    MovieDetails,
    MovieVideos,
    GenreList,
}

impl Endpoint {
    const ALL: [Endpoint; 5] = [
        Endpoint::Search,
        Endpoint::TopRated,
        Endpoint::MovieDetails,
        Endpoint::MovieVideos,
        Endpoint::GenreList,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Failure {
    status: u16,
    /// Number of calls that succeed before the endpoint starts failing
    after: usize,
}

/// Catalog held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    /// Movies in insertion order; search results keep this order
    movies: Vec<RawSearchResult>,
    details: HashMap<MovieId, MovieDetails>,
    videos: HashMap<MovieId, Vec<Video>>,
    genres: Vec<Genre>,
    failures: HashMap<Endpoint, Failure>,
    calls: [AtomicUsize; Endpoint::ALL.len()],
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a movie that search and top-rated can return
    pub fn insert_movie(&mut self, movie: RawSearchResult) {
        self.movies.push(movie);
    }

    pub fn insert_details(&mut self, details: MovieDetails) {
        self.details.insert(details.id, details);
    }

    /// Append a video to a movie's list, keeping insertion order
    pub fn insert_video(&mut self, movie_id: MovieId, video: Video) {
        self.videos.entry(movie_id).or_default().push(video);
    }

    pub fn insert_genre(&mut self, id: GenreId, name: impl Into<String>) {
        self.genres.push(Genre {
            id,
            name: name.into(),
        });
    }

    /// Make every call to `endpoint` fail with `status`
    pub fn fail(&mut self, endpoint: Endpoint, status: u16) {
        self.fail_after(endpoint, status, 0);
    }

    /// Let the first `successes` calls to `endpoint` through, then fail
    pub fn fail_after(&mut self, endpoint: Endpoint, status: u16, successes: usize) {
        self.failures.insert(
            endpoint,
            Failure {
                status,
                after: successes,
            },
        );
    }

    /// How many times `endpoint` has been called so far
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls[endpoint.index()].load(Ordering::SeqCst)
    }

    /// Total calls across all endpoints
    pub fn total_calls(&self) -> usize {
        Endpoint::ALL.iter().map(|e| self.calls(*e)).sum()
    }

    /// Record a call and return the injected failure, if it applies
    fn record(&self, endpoint: Endpoint) -> Result<()> {
        let previous = self.calls[endpoint.index()].fetch_add(1, Ordering::SeqCst);
        match self.failures.get(&endpoint) {
            Some(failure) if previous >= failure.after => Err(CatalogError::Upstream {
                status: failure.status,
                message: format!("injected failure on {:?}", endpoint),
            }),
            _ => Ok(()),
        }
    }

    /// Keep movies carrying every genre id listed in a comma-separated filter.
    ///
    /// Tokens that are not numeric match nothing.
    fn matches_filter(movie: &RawSearchResult, genre_filter: Option<&str>) -> bool {
        let Some(filter) = genre_filter else {
            return true;
        };
        filter
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .all(|token| match token.parse::<GenreId>() {
                Ok(id) => movie.genre_ids.contains(&id),
                Err(_) => false,
            })
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn search(
        &self,
        query: &str,
        genre_filter: Option<&str>,
    ) -> Result<Vec<RawSearchResult>> {
        self.record(Endpoint::Search)?;

        // Case-insensitive substring match on the title
        let needle = query.to_lowercase();
        let results: Vec<RawSearchResult> = self
            .movies
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .filter(|movie| Self::matches_filter(movie, genre_filter))
            .cloned()
            .collect();
        debug!("In-memory search '{}' matched {} movies", query, results.len());
        Ok(results)
    }

    async fn top_rated(&self, genre_filter: Option<&str>) -> Result<Vec<RawSearchResult>> {
        self.record(Endpoint::TopRated)?;

        let mut results: Vec<RawSearchResult> = self
            .movies
            .iter()
            .filter(|movie| Self::matches_filter(movie, genre_filter))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
        Ok(results)
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails> {
        self.record(Endpoint::MovieDetails)?;
        self.details
            .get(&id)
            .cloned()
            .ok_or(CatalogError::MovieNotFound { id })
    }

    async fn movie_videos(&self, id: MovieId) -> Result<Vec<Video>> {
        self.record(Endpoint::MovieVideos)?;
        Ok(self.videos.get(&id).cloned().unwrap_or_default())
    }

    async fn genre_catalog(&self) -> Result<GenreCatalog> {
        self.record(Endpoint::GenreList)?;
        Ok(self.genres.iter().cloned().collect())
    }
}
