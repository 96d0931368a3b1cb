//! Catalog and favorites sources.
//!
//! The catalog is read once and augmented into immutable [`VideoRecord`]s.
//! Favorites come from an external key-value store that is only ever read.

use crate::models::{VideoEntry, VideoRecord};
use crate::search::{SearchError, SearchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Video id -> favorite flag
pub type FavoritesMap = HashMap<String, bool>;

/// Read-only source of the favorites mapping
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn load_favorites(&self) -> SearchResult<FavoritesMap>;
}

/// In-memory favorites (for tests and embedding)
#[derive(Debug, Clone, Default)]
pub struct InMemoryFavorites {
    favorites: FavoritesMap,
}

impl InMemoryFavorites {
    pub fn new(favorites: FavoritesMap) -> Self {
        Self { favorites }
    }

    pub fn with_favorite(mut self, id: impl Into<String>) -> Self {
        self.favorites.insert(id.into(), true);
        self
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavorites {
    async fn load_favorites(&self) -> SearchResult<FavoritesMap> {
        Ok(self.favorites.clone())
    }
}

/// Favorites persisted as a JSON object `{"<id>": true, ...}`.
///
/// A missing file is an empty mapping.
#[derive(Debug, Clone)]
pub struct JsonFavoritesStore {
    path: PathBuf,
}

impl JsonFavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FavoritesStore for JsonFavoritesStore {
    async fn load_favorites(&self) -> SearchResult<FavoritesMap> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No favorites file, starting empty");
                return Ok(FavoritesMap::new());
            }
            Err(err) => return Err(err.into()),
        };

        let favorites: FavoritesMap = serde_json::from_str(&raw).map_err(|e| {
            SearchError::FavoritesLoadFailed(format!("{}: {}", self.path.display(), e))
        })?;

        debug!(count = favorites.len(), "Loaded favorites");
        Ok(favorites)
    }
}

/// Read a JSON array of catalog rows
pub async fn load_catalog(path: impl AsRef<Path>) -> SearchResult<Vec<VideoEntry>> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await?;

    let entries: Vec<VideoEntry> = serde_json::from_str(&raw)
        .map_err(|e| SearchError::CatalogLoadFailed(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), videos = entries.len(), "Loaded catalog");
    Ok(entries)
}

/// Derive search fields for every entry
pub fn augment_catalog(entries: Vec<VideoEntry>, favorites: &FavoritesMap) -> Vec<VideoRecord> {
    entries
        .into_iter()
        .map(|entry| VideoRecord::augment(entry, favorites))
        .collect()
}
