//! On-demand, per-movie lookups: vote count and trailer key.
//!
//! These are not part of aggregation. Every call goes to the catalog; there
//! is no caching and no retry.
//!
//! Each lookup comes in two forms:
//! - `vote_count` / `trailer_key` collapse every kind of absence to `None`
//! - `lookup_vote_count` / `lookup_trailer_key` return a [`Lookup`] that
//!   says *why* nothing was found

use std::sync::Arc;

use catalog::{CatalogError, CatalogService, MovieId, Video, VoteCount};
use tracing::{debug, warn};

/// Why a lookup produced no value
#[derive(Debug, Clone, PartialEq)]
pub enum Absence {
    /// The catalog call failed
    Unavailable(CatalogError),
    /// The record was fetched but the field is missing or malformed
    MissingField,
    /// The list was fetched but no entry matched
    NoMatch,
}

/// Outcome of a single detail lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Absent(Absence),
}

impl<T> Lookup<T> {
    /// Collapse to an `Option`, discarding the absence reason
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn absence(&self) -> Option<&Absence> {
        match self {
            Lookup::Found(_) => None,
            Lookup::Absent(reason) => Some(reason),
        }
    }
}

/// Per-movie detail queries against a shared catalog
#[derive(Clone)]
pub struct DetailLookup {
    catalog: Arc<dyn CatalogService>,
}

impl DetailLookup {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    /// Vote count for a movie, or `None` if it could not be determined.
    pub async fn vote_count(&self, movie_id: MovieId) -> Option<VoteCount> {
        self.lookup_vote_count(movie_id).await.into_option()
    }

    /// Vote count for a movie, with the reason when absent.
    pub async fn lookup_vote_count(&self, movie_id: MovieId) -> Lookup<VoteCount> {
        let details = match self.catalog.movie_details(movie_id).await {
            Ok(details) => details,
            Err(err) => {
                warn!(movie_id, error = %err, "Failed to fetch movie details");
                return Lookup::Absent(Absence::Unavailable(err));
            }
        };

        match details.vote_count() {
            Some(count) => {
                debug!(movie_id, count = %count, "Vote count found");
                Lookup::Found(count)
            }
            None => {
                warn!(movie_id, raw = ?details.vote_count, "Invalid vote count");
                Lookup::Absent(Absence::MissingField)
            }
        }
    }

    /// Key of the first YouTube trailer for a movie, or `None`.
    pub async fn trailer_key(&self, movie_id: MovieId) -> Option<String> {
        self.lookup_trailer_key(movie_id).await.into_option()
    }

    /// Key of the first YouTube trailer for a movie, with the reason when absent.
    pub async fn lookup_trailer_key(&self, movie_id: MovieId) -> Lookup<String> {
        let videos = match self.catalog.movie_videos(movie_id).await {
            Ok(videos) => videos,
            Err(err) => {
                warn!(movie_id, error = %err, "Failed to fetch movie videos");
                return Lookup::Absent(Absence::Unavailable(err));
            }
        };

        match select_trailer(&videos) {
            Some(video) => Lookup::Found(video.key.clone()),
            None => {
                warn!(movie_id, videos = videos.len(), "No official trailer found");
                Lookup::Absent(Absence::NoMatch)
            }
        }
    }
}

/// First video, in list order, that is a YouTube trailer.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|video| video.is_youtube_trailer())
}
