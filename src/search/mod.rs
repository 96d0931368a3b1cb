//! Faceted search over an in-memory video catalog
//!
//! This module emulates a hosted faceted-search index on the client side:
//!
//! - **Text Matching**: case-insensitive substring match on track and title
//! - **Facet Filters**: `attribute:value` groups, OR within a group, AND across groups
//! - **Chords Mode**: `exact`, `any`, `all` or `none` combination for the `chords` facet
//! - **Numeric Filters**: `attribute operator number` clauses, AND'd
//! - **Facet Counts**: per-attribute value counts and `chordCount` min/max
//! - **Facet Value Search**: autocomplete over the facets of the latest search
//!
//! # Pipeline
//!
//! ```text
//!  sorted catalog ──► favorites ──► text query ──┬──► facet filters ──► numeric ──► result[0]
//!                                                └───────────────────────────────► result[1]
//! ```
//!
//! The first result holds the fully filtered set; the second only applies
//! the favorites and text filters, so callers can show which other facet
//! values would still yield hits.
//!
//! # Example
//!
//! ```no_run
//! use video_facet_search::catalog::FavoritesMap;
//! use video_facet_search::search::{SearchConfig, SearchRequest, SearchSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let entries = video_facet_search::catalog::load_catalog("data/published.json").await?;
//!     let session = SearchSession::new(entries, &FavoritesMap::new(), SearchConfig::default())?;
//!
//!     let request = SearchRequest::new("tum")
//!         .with_facet_group(vec!["chords:C", "chords:G"])
//!         .with_numeric_filter("chordCount<=4");
//!
//!     let results = session.search(&[request]).await;
//!     println!("Found {} videos", results.results[0].nb_hits);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod facets;
mod filter;
mod numeric;
mod query;
mod service;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use error::{SearchError, SearchResult};
pub use facets::{count_facets, facet_stats, FacetCounts, FacetStats, FacetTable, UNKNOWN_VALUE};
pub use filter::{apply_facet_filters, filter_by_query, filter_favorites, list_matches, matches_query};
pub use numeric::{apply_numeric_filters, Comparator, NumericClause};
pub use query::{
    parse_facet_filters, ChordsSearchMode, FacetAttribute, FacetValuesParams, FacetValuesRequest,
    FilterGroup, SearchParams, SearchRequest, SortMode,
};
pub use service::{
    build_result, FacetHit, FacetValuesResponse, SearchResponse, SearchResults, SearchSession,
};
