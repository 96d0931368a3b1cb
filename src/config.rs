use crate::search::ChordsSearchMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Catalog sources
    pub catalog: CatalogConfig,

    /// Search session defaults
    #[validate(nested)]
    pub search: SearchSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("VIDEO_SEARCH_CONFIG").unwrap_or_else(|_| "config/local.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (VFS__SECTION__KEY)
            .add_source(
                config::Environment::with_prefix("VFS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load and validate in one step
    pub fn load_validated() -> crate::error::Result<Self> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON array of published catalog rows
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    /// JSON object mapping video id to favorite flag
    pub favorites_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            favorites_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchSettings {
    /// Combination mode applied to the `chords` facet
    #[serde(default)]
    pub chords_search_mode: ChordsSearchMode,

    /// Page size used when a request omits `hitsPerPage`
    #[serde(default = "default_hits_per_page")]
    #[validate(range(min = 1, max = 1000))]
    pub default_hits_per_page: usize,

    /// Index name used when a request omits `indexName`
    #[serde(default = "default_index_name")]
    #[validate(length(min = 1))]
    pub default_index_name: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            chords_search_mode: ChordsSearchMode::default(),
            default_hits_per_page: default_hits_per_page(),
            default_index_name: default_index_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for the crate's targets
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions for serde
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/published.json")
}

fn default_hits_per_page() -> usize {
    20
}

fn default_index_name() -> String {
    "videos".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
