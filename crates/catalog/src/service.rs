//! The capability set every catalog backend provides.
//!
//! Implementations report failures faithfully through `CatalogError`; it is
//! up to the consumer to decide which failures degrade to "no data".

use async_trait::async_trait;

use crate::error::Result;
use crate::genres::GenreCatalog;
use crate::types::{GenreId, MovieDetails, MovieId, RawSearchResult, Video};

/// Remote (or in-process) source of movie records.
///
/// ## Design Note
/// - `Send + Sync` so one instance can be shared behind an `Arc` by the
///   enrichment pipeline and the detail lookup at the same time
/// - Credentials are a construction-time concern of the implementation and
///   never appear in these signatures
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Returns the name of this backend (for logging)
    fn name(&self) -> &str;

    /// Free-text movie search, one page, optionally restricted to a genre.
    ///
    /// The genre filter is passed through verbatim; it is not validated here.
    async fn search(
        &self,
        query: &str,
        genre_filter: Option<&str>,
    ) -> Result<Vec<RawSearchResult>>;

    /// The catalog's top-rated listing, one page.
    async fn top_rated(&self, genre_filter: Option<&str>) -> Result<Vec<RawSearchResult>>;

    /// Full details for a single movie
    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails>;

    /// Video list for a single movie, in catalog order
    async fn movie_videos(&self, id: MovieId) -> Result<Vec<Video>>;

    /// Fetch the complete genre list
    async fn genre_catalog(&self) -> Result<GenreCatalog>;

    /// Resolve genre ids to names, order-preserving.
    ///
    /// Each call fetches the full genre list; a failed fetch or an unknown
    /// id is an error, never an empty or shortened list.
    async fn genre_names(&self, ids: &[GenreId]) -> Result<Vec<String>> {
        let catalog = self.genre_catalog().await?;
        catalog.resolve(ids)
    }
}
