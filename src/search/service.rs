//! Search session: the client facade over the in-memory catalog

use crate::catalog::{augment_catalog, FavoritesMap, FavoritesStore};
use crate::models::{VideoEntry, VideoRecord};
use crate::search::config::SearchConfig;
use crate::search::error::{SearchError, SearchResult};
use crate::search::facets::{count_facets, facet_stats, FacetStats, FacetTable};
use crate::search::filter::{apply_facet_filters, filter_by_query, filter_favorites};
use crate::search::numeric::apply_numeric_filters;
use crate::search::query::{parse_facet_filters, FacetValuesRequest, SearchRequest, SortMode};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// One page of results with the facets of the set it was cut from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Records on the requested page
    pub hits: Vec<VideoRecord>,

    /// Total number of matching records
    pub nb_hits: usize,

    /// Requested page
    pub page: usize,

    /// `ceil(nb_hits / hits_per_page)`
    pub nb_pages: usize,

    pub hits_per_page: usize,

    /// Value counts per attribute over the whole matching set
    pub facets: FacetTable,

    /// Numeric stats per attribute
    #[serde(rename = "facets_stats")]
    pub facets_stats: BTreeMap<String, FacetStats>,

    /// Query text that was executed
    pub query: String,

    /// Echoed index name
    pub index: String,
}

/// Response of a multi-index search call
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    /// `[filtered, unfiltered]`: the second result reflects only text and
    /// favorites filtering
    pub results: Vec<SearchResponse>,
}

/// A facet value suggestion
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FacetHit {
    pub value: String,
    pub count: usize,
    pub highlighted: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetValuesResponse {
    pub facet_hits: Vec<FacetHit>,
}

/// Cut one page out of `records` and attach the facets of the full set
pub fn build_result(
    records: &[&VideoRecord],
    page: usize,
    hits_per_page: usize,
    index_name: &str,
    query: &str,
) -> SearchResponse {
    let nb_hits = records.len();
    let nb_pages = if hits_per_page == 0 {
        0
    } else {
        nb_hits.div_ceil(hits_per_page)
    };

    let hits = records
        .iter()
        .skip(page.saturating_mul(hits_per_page))
        .take(hits_per_page)
        .map(|record| (*record).clone())
        .collect();

    let facets = count_facets(records);
    let facets_stats = facet_stats(&facets);

    SearchResponse {
        hits,
        nb_hits,
        page,
        nb_pages,
        hits_per_page,
        facets,
        facets_stats,
        query: query.to_string(),
        index: index_name.to_string(),
    }
}

/// Search client over a fixed catalog.
///
/// The catalog and the chords mode never change for the lifetime of the
/// session. The facet table of the latest `search` call is kept for
/// `search_for_facet_values`; overlapping calls must be serialized by the
/// caller.
pub struct SearchSession {
    records: Vec<VideoRecord>,

    /// Record indices sorted by track, ascending
    by_track: Vec<usize>,

    /// Record indices sorted by upload date, newest first
    by_upload_date: Vec<usize>,

    by_id: HashMap<String, usize>,

    config: SearchConfig,

    last_facets: RwLock<Option<FacetTable>>,
}

impl SearchSession {
    /// Create a session from catalog rows and a favorites mapping
    pub fn new(
        entries: Vec<VideoEntry>,
        favorites: &FavoritesMap,
        config: SearchConfig,
    ) -> SearchResult<Self> {
        config.validate()?;

        let records = augment_catalog(entries, favorites);

        let mut by_track: Vec<usize> = (0..records.len()).collect();
        by_track.sort_by(|&a, &b| records[a].entry.track.cmp(&records[b].entry.track));

        let mut by_upload_date: Vec<usize> = (0..records.len()).collect();
        by_upload_date
            .sort_by(|&a, &b| records[b].entry.upload_date.cmp(&records[a].entry.upload_date));

        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.object_id.clone(), i))
            .collect();

        info!(
            videos = records.len(),
            favorites = records.iter().filter(|r| r.favorite).count(),
            chords_search_mode = %config.chords_search_mode,
            "Search session created"
        );

        Ok(Self {
            records,
            by_track,
            by_upload_date,
            by_id,
            config,
            last_facets: RwLock::new(None),
        })
    }

    /// Create a session, reading favorites once from `store`
    pub async fn from_store(
        entries: Vec<VideoEntry>,
        store: &dyn FavoritesStore,
        config: SearchConfig,
    ) -> SearchResult<Self> {
        let favorites = store.load_favorites().await?;
        Self::new(entries, &favorites, config)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by `objectID`
    pub fn get(&self, id: &str) -> Option<&VideoRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    /// Like [`get`](Self::get), failing with `VideoNotFound` for unknown ids
    pub fn lookup(&self, id: &str) -> SearchResult<&VideoRecord> {
        self.get(id)
            .ok_or_else(|| SearchError::VideoNotFound(id.to_string()))
    }

    /// Other versions of the same song, in `id_related` order
    pub fn related(&self, id: &str) -> Vec<&VideoRecord> {
        match self.get(id) {
            Some(record) => record.related_ids().filter_map(|other| self.get(other)).collect(),
            None => Vec::new(),
        }
    }

    /// Run the first request; returns `[filtered, unfiltered]` results
    pub async fn search(&self, requests: &[SearchRequest]) -> SearchResults {
        let Some(request) = requests.first() else {
            warn!("Search called without requests");
            return SearchResults::default();
        };
        if requests.len() > 1 {
            debug!(ignored = requests.len() - 1, "Only the first search request is executed");
        }

        let (filtered, unfiltered) = self.execute(request);
        SearchResults {
            results: vec![filtered, unfiltered],
        }
    }

    /// Facet values of the latest search whose name contains the query,
    /// case-insensitively. Empty when no search has run yet.
    pub async fn search_for_facet_values(
        &self,
        requests: &[FacetValuesRequest],
    ) -> FacetValuesResponse {
        let Some(request) = requests.first() else {
            warn!("Facet value search called without requests");
            return FacetValuesResponse::default();
        };
        let params = &request.params;

        let guard = self.last_facets.read();
        let Some(facets) = guard.as_ref() else {
            debug!(facet = %params.facet_name, "No facets cached yet, returning no facet hits");
            return FacetValuesResponse::default();
        };
        let Some(counts) = facets.get(&params.facet_name) else {
            debug!(facet = %params.facet_name, "Unknown facet");
            return FacetValuesResponse::default();
        };

        let needle = params.facet_query.to_lowercase();
        let facet_hits = counts
            .iter()
            .filter(|(value, _)| value.to_lowercase().contains(&needle))
            .map(|(value, &count)| FacetHit {
                value: value.clone(),
                count,
                highlighted: value.clone(),
            })
            .collect();

        FacetValuesResponse { facet_hits }
    }

    /// Drop the cached facet table
    pub fn clear_cache(&self) {
        *self.last_facets.write() = None;
    }

    fn ordered(&self, sort: SortMode) -> Vec<&VideoRecord> {
        let order = match sort {
            SortMode::UploadDate => &self.by_upload_date,
            SortMode::Track => &self.by_track,
        };
        order.iter().map(|&i| &self.records[i]).collect()
    }

    fn execute(&self, request: &SearchRequest) -> (SearchResponse, SearchResponse) {
        let params = &request.params;
        let index_name = request
            .index_name
            .as_deref()
            .unwrap_or(self.config.default_index_name.as_str());
        let page = params.page.unwrap_or(0);
        let hits_per_page = params
            .hits_per_page
            .unwrap_or(self.config.default_hits_per_page);
        let groups = parse_facet_filters(&params.facet_filters);

        let sorted = self.ordered(SortMode::from_index_name(index_name));
        let favorites = filter_favorites(sorted, &params.facet_filters);
        let matched = filter_by_query(favorites, &params.query);
        let faceted =
            apply_facet_filters(matched.clone(), &groups, self.config.chords_search_mode);
        let narrowed = apply_numeric_filters(faceted, &params.numeric_filters);

        debug!(
            index = %index_name,
            query = %params.query,
            matched = matched.len(),
            filtered = narrowed.len(),
            "Executed search"
        );

        let filtered = build_result(&narrowed, page, hits_per_page, index_name, &params.query);
        let unfiltered = build_result(&matched, page, hits_per_page, index_name, &params.query);

        *self.last_facets.write() = Some(filtered.facets.clone());

        (filtered, unfiltered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::ChordsSearchMode;
    use crate::error::AppError;
    use crate::search::SearchConfigBuilder;

    fn entry(id: &str, track: &str, upload_date: &str) -> VideoEntry {
        VideoEntry {
            id: id.to_string(),
            track: track.to_string(),
            title: format!("{} tutorial", track),
            upload_date: upload_date.to_string(),
            ..Default::default()
        }
    }

    fn session(entries: Vec<VideoEntry>) -> SearchSession {
        let config = SearchConfigBuilder::new()
            .chords_search_mode(ChordsSearchMode::Any)
            .build();
        SearchSession::new(entries, &FavoritesMap::new(), config).unwrap()
    }

    fn hit_ids(response: &SearchResponse) -> Vec<&str> {
        response.hits.iter().map(|h| h.id()).collect()
    }

    #[test]
    fn test_build_result_pagination() {
        let entries: Vec<_> = (0..5)
            .map(|i| entry(&format!("v{}", i), "Song", "20200101"))
            .collect();
        let records = augment_catalog(entries, &FavoritesMap::new());
        let refs: Vec<_> = records.iter().collect();

        let first = build_result(&refs, 0, 2, "videos", "");
        assert_eq!(first.hits.len(), 2);
        assert_eq!(first.nb_hits, 5);
        assert_eq!(first.nb_pages, 3);

        let last = build_result(&refs, 2, 2, "videos", "");
        assert_eq!(last.hits.len(), 1);
        assert_eq!(last.hits[0].id(), "v4");

        let past_end = build_result(&refs, 3, 2, "videos", "");
        assert!(past_end.hits.is_empty());
        assert_eq!(past_end.facets["tuning"]["Standard"], 5);
    }

    #[test]
    fn test_build_result_zero_page_size() {
        let records = augment_catalog(vec![entry("a", "Song", "")], &FavoritesMap::new());
        let refs: Vec<_> = records.iter().collect();

        let result = build_result(&refs, 0, 0, "videos", "");
        assert!(result.hits.is_empty());
        assert_eq!(result.nb_pages, 0);
        assert_eq!(result.nb_hits, 1);
    }

    #[tokio::test]
    async fn test_sort_by_upload_date_newest_first() {
        let session = session(vec![
            entry("old", "A", "2021-01-01"),
            entry("new", "B", "2022-01-01"),
        ]);

        let results = session
            .search(&[SearchRequest::new("").with_index("upload_date")])
            .await;
        assert_eq!(hit_ids(&results.results[0]), vec!["new", "old"]);

        let results = session.search(&[SearchRequest::new("").with_index("videos")]).await;
        assert_eq!(hit_ids(&results.results[0]), vec!["old", "new"]);
    }

    #[tokio::test]
    async fn test_equal_keys_keep_catalog_order() {
        let session = session(vec![
            entry("x", "Same", "2020"),
            entry("y", "Same", "2020"),
            entry("z", "Same", "2020"),
        ]);

        for index in ["videos", "upload_date"] {
            let results = session.search(&[SearchRequest::new("").with_index(index)]).await;
            assert_eq!(hit_ids(&results.results[0]), vec!["x", "y", "z"]);
        }
    }

    #[tokio::test]
    async fn test_facet_values_before_search_is_empty() {
        let session = session(vec![entry("a", "Song", "")]);
        let response = session
            .search_for_facet_values(&[FacetValuesRequest::new("tuning", "")])
            .await;
        assert!(response.facet_hits.is_empty());
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let session = session(vec![entry("a", "Song", "")]);
        session.search(&[SearchRequest::new("")]).await;

        let request = [FacetValuesRequest::new("tuning", "stand")];
        assert_eq!(session.search_for_facet_values(&request).await.facet_hits.len(), 1);

        session.clear_cache();
        assert!(session.search_for_facet_values(&request).await.facet_hits.is_empty());
    }

    #[tokio::test]
    async fn test_empty_requests() {
        let session = session(vec![entry("a", "Song", "")]);
        assert!(session.search(&[]).await.results.is_empty());
        assert!(session.search_for_facet_values(&[]).await.facet_hits.is_empty());
    }

    #[test]
    fn test_related_versions() {
        let mut a = entry("a", "Song", "");
        a.id_related = "a,b,missing".to_string();
        let session = session(vec![a, entry("b", "Song", "")]);

        let related: Vec<_> = session.related("a").iter().map(|r| r.id()).collect();
        assert_eq!(related, vec!["b"]);
        assert!(session.related("nope").is_empty());
        assert!(session.get("b").is_some());
    }

    #[test]
    fn test_lookup_unknown_id() {
        let session = session(vec![entry("a", "Song", "")]);
        assert_eq!(session.lookup("a").unwrap().id(), "a");

        let err = session.lookup("zzz").unwrap_err();
        assert!(matches!(err, SearchError::VideoNotFound(ref id) if id == "zzz"));
        assert_eq!(AppError::from(err).error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SearchConfigBuilder::new().default_hits_per_page(0).build();
        assert!(SearchSession::new(vec![], &FavoritesMap::new(), config).is_err());
    }
}
