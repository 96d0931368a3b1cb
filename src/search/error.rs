//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors raised while building a search session or looking up a video.
///
/// Searches themselves never fail: bad filters degrade to empty or
/// unrestricted result sets.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Catalog could not be read or parsed
    #[error("Catalog load failed: {0}")]
    CatalogLoadFailed(String),

    /// Favorites mapping could not be read or parsed
    #[error("Favorites load failed: {0}")]
    FavoritesLoadFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No video with this id in the catalog
    #[error("Video not found: {0}")]
    VideoNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            SearchError::IoError(err) => AppError::Io(err),
            SearchError::VideoNotFound(id) => AppError::NotFound(id),
            SearchError::CatalogLoadFailed(msg) | SearchError::FavoritesLoadFailed(msg) => {
                AppError::Serialization(msg)
            }
        }
    }
}
