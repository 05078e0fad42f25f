//! Genre id -> name lookup.
//!
//! The catalog only ever hands out genre ids on search results; names come
//! from a separate full-list endpoint. `GenreCatalog` holds one snapshot of
//! that list and resolves id sequences against it.

use std::collections::HashMap;

use crate::error::{CatalogError, Result};
use crate::types::{Genre, GenreId};

/// One snapshot of the catalog's genre list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreCatalog {
    names: HashMap<GenreId, String>,
}

impl GenreCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the genre list as returned by the catalog.
    ///
    /// Later duplicates of an id win, matching a plain map insert.
    pub fn from_genres(genres: impl IntoIterator<Item = Genre>) -> Self {
        let names = genres
            .into_iter()
            .map(|genre| (genre.id, genre.name))
            .collect();
        Self { names }
    }

    pub fn insert(&mut self, id: GenreId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn name(&self, id: GenreId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve ids to names, preserving order.
    ///
    /// The first id with no name fails the whole resolution; entries are
    /// never silently dropped.
    pub fn resolve(&self, ids: &[GenreId]) -> Result<Vec<String>> {
        ids.iter()
            .map(|id| {
                self.name(*id)
                    .map(str::to_string)
                    .ok_or(CatalogError::UnknownGenre { id: *id })
            })
            .collect()
    }
}

impl FromIterator<Genre> for GenreCatalog {
    fn from_iter<I: IntoIterator<Item = Genre>>(iter: I) -> Self {
        Self::from_genres(iter)
    }
}
