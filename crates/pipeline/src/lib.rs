//! Aggregation and ranking of catalog search results.
//!
//! This crate provides:
//! - EnrichmentPipeline: search results joined with genre names, ranked by score
//! - DetailLookup: lazy per-movie vote count and trailer queries
//! - GenreGrouping: per-genre top-N leaderboards
//!
//! ## Architecture
//! Results flow in stages:
//! 1. The catalog search returns raw results
//! 2. EnrichmentPipeline resolves genres and sorts
//! 3. GenreGrouping optionally buckets the sorted summaries
//!
//! DetailLookup is independent of the above and is driven by whoever
//! presents the results.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{DetailLookup, EnrichmentPipeline, GenreGrouping};
//! use std::sync::Arc;
//!
//! let catalog: Arc<dyn CatalogService> = Arc::new(client);
//! let movies = EnrichmentPipeline::new(catalog.clone())
//!     .aggregate("thor", Some("28"))
//!     .await?;
//!
//! let leaderboards = GenreGrouping::default().group_by_genre(&movies);
//!
//! let lookup = DetailLookup::new(catalog);
//! let trailer = lookup.trailer_key(movies[0].id).await;
//! ```

pub mod details;
pub mod enrichment;
pub mod grouping;

// Re-export main types
pub use details::{Absence, DetailLookup, Lookup, select_trailer};
pub use enrichment::{EnrichmentPipeline, rank_by_score};
pub use grouping::{DEFAULT_BUCKET_SIZE, GenreBuckets, GenreGrouping, group_by_genre};
