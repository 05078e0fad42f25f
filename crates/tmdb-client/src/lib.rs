//! TMDB client implementing [`catalog::CatalogService`].
//!
//! Talks to the TMDB v3 REST API over HTTP:
//! - One request per trait call, no caching, no retries
//! - The API key from [`ClientConfig`] is attached to every request
//! - Non-success statuses become `CatalogError::Upstream`, carrying
//!   TMDB's `status_message` when the body has one
//!
//! ```ignore
//! use tmdb_client::{ClientConfig, TmdbClient};
//!
//! let client = TmdbClient::new(ClientConfig::new(api_key))?;
//! let results = client.search("thor", Some("28")).await?;
//! ```

mod service;
mod client;

pub use client::{ClientConfig, TmdbClient, DEFAULT_BASE_URL};
