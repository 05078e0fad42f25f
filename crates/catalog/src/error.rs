//! Error types for the catalog crate.
//!
//! Every failure a catalog backend can report is a variant here, so callers
//! can tell "the upstream said no" apart from "the data was malformed" even
//! when the pipeline later collapses both into an empty result.

use thiserror::Error;

use crate::types::{GenreId, MovieId};

/// Errors that can occur while talking to a movie catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The catalog answered with a non-success status code
    #[error("Catalog returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never produced a response (DNS, connect, TLS, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape
    ///
    /// `path` points at the offending field when the decoder could tell.
    #[error("Failed to decode response at '{path}': {reason}")]
    Decode { path: String, reason: String },

    /// A genre id is not present in the genre catalog
    #[error("Unknown genre id {id}")]
    UnknownGenre { id: GenreId },

    /// Genre resolution returned a different number of names than ids
    #[error("Movie {movie_id} has {expected} genre ids but {found} names were resolved")]
    GenreCountMismatch {
        movie_id: MovieId,
        expected: usize,
        found: usize,
    },

    /// Requested movie does not exist in the catalog
    #[error("Movie {id} not found")]
    MovieNotFound { id: MovieId },

    /// The caller supplied a query the catalog cannot run
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Client configuration was rejected before any request was made
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CatalogError {
    /// True for failures that mean "the catalog could not be reached or
    /// refused the request", as opposed to bad input or bad data.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            CatalogError::Upstream { .. } | CatalogError::Transport(_)
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
