//! Core domain types for the movie catalog.
//!
//! Two families of types live here:
//! - Raw records exactly as the catalog returns them (`RawSearchResult`,
//!   `MovieDetails`, `Video`, `Genre`)
//! - The enriched `MovieSummary` the pipeline builds from them

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie in the catalog
pub type MovieId = u64;

/// Unique identifier for a genre in the catalog (e.g. 28 = Action)
pub type GenreId = u32;

/// Number of votes a movie has received, exactly as the catalog reported it
pub type VoteCount = serde_json::Number;

// =============================================================================
// URL constants
// =============================================================================

/// Image host prefix every poster path is appended to
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Watch page prefix for YouTube-hosted trailers
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Public web page prefix for a movie
pub const MOVIE_PAGE_URL: &str = "https://www.themoviedb.org/movie/";

/// Build the full poster URL for an optional poster path.
///
/// A missing path is not special-cased: the result is the bare prefix.
pub fn poster_url(poster_path: Option<&str>) -> String {
    format!("{}{}", POSTER_BASE_URL, poster_path.unwrap_or_default())
}

/// Link to watch a trailer given its YouTube key
pub fn trailer_watch_url(key: &str) -> String {
    format!("{}{}", YOUTUBE_WATCH_URL, key)
}

/// Link to the catalog's public page for a movie
pub fn movie_page_url(id: MovieId) -> String {
    format!("{}{}", MOVIE_PAGE_URL, id)
}

// =============================================================================
// Raw catalog records
// =============================================================================

/// One entry of a search (or top-rated) result page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSearchResult {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    /// Average score, 0-10 by catalog convention
    pub vote_average: f64,
    /// Genre ids in catalog order
    pub genre_ids: Vec<GenreId>,
}

/// Full movie record from the details endpoint.
///
/// Only the fields the pipeline reads are typed; `vote_count` is kept as a
/// raw JSON value because the catalog does not guarantee it is numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vote_count: Option<serde_json::Value>,
}

impl MovieDetails {
    /// The vote count, if present and numeric.
    ///
    /// Any JSON number is returned unchanged; strings, nulls and anything
    /// else yield `None`.
    pub fn vote_count(&self) -> Option<VoteCount> {
        match self.vote_count.as_ref()? {
            serde_json::Value::Number(count) => Some(count.clone()),
            _ => None,
        }
    }
}

/// An entry of a movie's video list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Video classification ("Trailer", "Teaser", "Clip", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Hosting site ("YouTube", "Vimeo", ...)
    pub site: String,
    /// Site-specific key
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Video {
    pub fn new(kind: impl Into<String>, site: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            site: site.into(),
            key: key.into(),
            name: None,
        }
    }

    /// Exact, case-sensitive match on type "Trailer" hosted on "YouTube"
    pub fn is_youtube_trailer(&self) -> bool {
        self.kind == "Trailer" && self.site == "YouTube"
    }
}

/// An id/name pair from the genre list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

// =============================================================================
// MovieSummary - the enriched record
// =============================================================================

/// A search result joined with its genre names.
///
/// Built once per aggregation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub poster_url: String,
    /// Sole sort and rank key
    pub score_average: f64,
    /// Genre names, in the same order as the source genre ids
    pub genres: Vec<String>,
}

impl MovieSummary {
    /// Join a raw result with its already-resolved genre names.
    ///
    /// Fails with `GenreCountMismatch` if the number of names does not match
    /// the number of genre ids on the raw record, and with `Decode` if the
    /// title is blank.
    pub fn from_raw(raw: &RawSearchResult, genres: Vec<String>) -> Result<Self> {
        if genres.len() != raw.genre_ids.len() {
            return Err(CatalogError::GenreCountMismatch {
                movie_id: raw.id,
                expected: raw.genre_ids.len(),
                found: genres.len(),
            });
        }
        if raw.title.trim().is_empty() {
            return Err(CatalogError::Decode {
                path: format!("results[id={}].title", raw.id),
                reason: "title is empty".to_string(),
            });
        }

        Ok(Self {
            id: raw.id,
            title: raw.title.clone(),
            poster_url: poster_url(raw.poster_path.as_deref()),
            score_average: raw.vote_average,
            genres,
        })
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}
