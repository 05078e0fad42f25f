//! # Catalog Crate
//!
//! Data model and service boundary for a remote movie catalog.
//!
//! ## Main Components
//!
//! - **types**: Raw catalog records and the enriched `MovieSummary`
//! - **genres**: Genre id -> name resolution
//! - **service**: The `CatalogService` trait every backend implements
//! - **memory**: An in-process backend for tests and offline runs
//! - **error**: Error taxonomy shared by all backends
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogService, InMemoryCatalog, RawSearchResult};
//! use std::sync::Arc;
//!
//! let mut catalog = InMemoryCatalog::new();
//! catalog.insert_genre(28, "Action");
//! catalog.insert_movie(RawSearchResult {
//!     id: 10195,
//!     title: "Thor".to_string(),
//!     poster_path: Some("/prSfAi1xGrhLQNxVSUFh61xQ4Qy.jpg".to_string()),
//!     vote_average: 6.8,
//!     genre_ids: vec![28],
//! });
//!
//! let catalog: Arc<dyn CatalogService> = Arc::new(catalog);
//! let results = catalog.search("thor", None).await?;
//! ```

// Public modules
pub mod error;
pub mod genres;
pub mod memory;
pub mod service;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use genres::GenreCatalog;
pub use memory::{Endpoint, InMemoryCatalog};
pub use service::CatalogService;
pub use types::{
    // Type aliases
    GenreId,
    MovieId,
    VoteCount,
    // Records
    Genre,
    MovieDetails,
    MovieSummary,
    RawSearchResult,
    Video,
    // URL helpers
    movie_page_url,
    poster_url,
    trailer_watch_url,
    POSTER_BASE_URL,
};
