//! Search session configuration

use crate::config::SearchSettings;
use crate::search::error::{SearchError, SearchResult};
use crate::search::query::ChordsSearchMode;
use serde::{Deserialize, Serialize};

/// Search session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Combination mode for the `chords` facet, fixed for the session
    pub chords_search_mode: ChordsSearchMode,

    /// Page size when a request omits `hitsPerPage`
    pub default_hits_per_page: usize,

    /// Index name when a request omits `indexName`
    pub default_index_name: String,
}

impl SearchConfig {
    pub fn validate(&self) -> SearchResult<()> {
        if self.default_hits_per_page == 0 {
            return Err(SearchError::InvalidConfiguration(
                "default_hits_per_page must be greater than 0".to_string(),
            ));
        }
        if self.default_index_name.is_empty() {
            return Err(SearchError::InvalidConfiguration(
                "default_index_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            chords_search_mode: ChordsSearchMode::default(),
            default_hits_per_page: 20,
            default_index_name: "videos".to_string(),
        }
    }
}

impl From<&SearchSettings> for SearchConfig {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            chords_search_mode: settings.chords_search_mode,
            default_hits_per_page: settings.default_hits_per_page,
            default_index_name: settings.default_index_name.clone(),
        }
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn chords_search_mode(mut self, mode: ChordsSearchMode) -> Self {
        self.config.chords_search_mode = mode;
        self
    }

    pub fn default_hits_per_page(mut self, hits_per_page: usize) -> Self {
        self.config.default_hits_per_page = hits_per_page;
        self
    }

    pub fn default_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.config.default_index_name = index_name.into();
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
