//! Tests for loading catalogs and favorites from disk

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use video_facet_search::catalog::{load_catalog, FavoritesStore, JsonFavoritesStore};
use video_facet_search::models::{PublishState, Tuning};
use video_facet_search::search::*;

const CATALOG: &str = r#"[
  {
    "publish": 1, "ignore": 0, "id": "vid-1", "track": "Kesariya",
    "chords": ["C", "Em", "G"], "key": "", "album": "Brahmastra",
    "artists": ["Arijit Singh"], "composers": ["Pritam"], "language": "Hindi",
    "loop_start": 12, "loop_end": 200, "title": "Kesariya | Ukulele Tutorial",
    "channel": "UC1", "upload_date": "20220720", "uploader": "Uke Channel",
    "id_related": "vid-1,vid-3", "baritone": 0
  },
  {
    "publish": 0, "ignore": 0, "id": "vid-2", "track": "Perfect",
    "chords": ["G", "Em", "C", "D"], "key": "G", "album": "",
    "artists": ["Ed Sheeran"], "composers": [], "language": "English",
    "loop_start": 0, "loop_end": 263, "title": "Perfect baritone ukulele tutorial",
    "channel": "UC2", "upload_date": "20180301", "uploader": "Bari Uke",
    "id_related": null, "baritone": 1
  },
  {
    "publish": 1, "ignore": 0, "id": "vid-3", "track": "Kesariya",
    "chords": ["C", "G"], "key": "", "album": "Brahmastra",
    "artists": [""], "composers": [], "language": "Hindi",
    "title": "Kesariya easy ukulele tutorial", "channel": "UC2",
    "upload_date": "20220801", "uploader": "Bari Uke",
    "id_related": "vid-1,vid-3", "baritone": 0
  }
]"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

async fn create_test_session(favorites: &str) -> SearchSession {
    let catalog = write_temp(CATALOG);
    let favorites = write_temp(favorites);

    let entries = load_catalog(catalog.path()).await.unwrap();
    let store = JsonFavoritesStore::new(favorites.path());
    SearchSession::from_store(entries, &store, SearchConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_load_catalog_and_augment() {
    let session = create_test_session(r#"{"vid-2": true, "vid-3": false}"#).await;
    assert_eq!(session.len(), 3);

    let perfect = session.get("vid-2").unwrap();
    assert!(perfect.favorite);
    assert_eq!(perfect.tuning, Tuning::Baritone);
    assert_eq!(perfect.published, PublishState::Unpublished);
    assert_eq!(perfect.chord_count, 4);

    let kesariya = session.get("vid-3").unwrap();
    assert!(!kesariya.favorite);
    assert_eq!(kesariya.entry.loop_start, None);
}

#[tokio::test]
async fn test_facets_over_loaded_catalog() {
    let session = create_test_session("{}").await;
    let result = &session.search(&[SearchRequest::new("")]).await.results[0];

    assert_eq!(result.facets["album"]["Brahmastra"], 2);
    assert_eq!(result.facets["album"].len(), 1);
    assert_eq!(result.facets["artists"][UNKNOWN_VALUE], 1);
    assert_eq!(result.facets["tuning"]["Baritone"], 1);
    assert_eq!(result.facets["published"]["Published"], 2);
    assert_eq!(result.facets["uploader"]["Bari Uke"], 2);
    assert_eq!(result.facets_stats["chordCount"], FacetStats { min: 2, max: 4 });
}

#[tokio::test]
async fn test_scalar_and_numeric_filters_over_loaded_catalog() {
    let session = create_test_session("{}").await;

    let request = SearchRequest::new("kesariya")
        .with_index("upload_date")
        .with_facet_group(vec!["language:Hindi", "language:English"])
        .with_numeric_filter("publish=1");
    let results = session.search(&[request]).await.results;

    let ids: Vec<_> = results[0].hits.iter().map(|h| h.id()).collect();
    assert_eq!(ids, vec!["vid-3", "vid-1"]);

    let request = SearchRequest::new("").with_numeric_filter("loop_start>=10");
    let results = session.search(&[request]).await.results;
    assert_eq!(results[0].nb_hits, 1);
    assert_eq!(results[0].hits[0].id(), "vid-1");
}

#[tokio::test]
async fn test_related_versions_from_catalog() {
    let session = create_test_session("{}").await;

    let related: Vec<_> = session.related("vid-1").iter().map(|r| r.id()).collect();
    assert_eq!(related, vec!["vid-3"]);
    assert!(session.related("vid-2").is_empty());
}

#[tokio::test]
async fn test_missing_catalog_file() {
    let dir = TempDir::new().unwrap();
    let result = load_catalog(dir.path().join("missing.json")).await;
    assert!(matches!(result, Err(SearchError::IoError(_))));
}

#[tokio::test]
async fn test_invalid_catalog_json() {
    let file = write_temp(r#"{"not": "an array"}"#);
    let result = load_catalog(file.path()).await;
    assert!(matches!(result, Err(SearchError::CatalogLoadFailed(_))));
}

#[tokio::test]
async fn test_favorites_store_reads_flags() {
    let file = write_temp(r#"{"a": true, "b": false}"#);
    let favorites = JsonFavoritesStore::new(file.path())
        .load_favorites()
        .await
        .unwrap();

    assert_eq!(favorites.len(), 2);
    assert!(favorites["a"]);
    assert!(!favorites["b"]);
}
