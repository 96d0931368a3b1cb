//! Text matching and facet filtering over record sets
//!
//! Every function here keeps the relative order of the records it is given.

use crate::models::VideoRecord;
use crate::search::query::{ChordsSearchMode, FacetAttribute, FilterGroup};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, warn};

/// Case-insensitive substring match on `track` or `title`.
///
/// `query` must already be lower-cased. An empty query matches everything.
pub fn matches_query(record: &VideoRecord, query: &str) -> bool {
    query.is_empty()
        || record.entry.track.to_lowercase().contains(query)
        || record.entry.title.to_lowercase().contains(query)
}

pub fn filter_by_query<'a>(records: Vec<&'a VideoRecord>, query: &str) -> Vec<&'a VideoRecord> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| matches_query(record, &query))
        .collect()
}

/// Whether any token of any raw `facetFilters` group names the `favorite`
/// attribute, wherever it sits in its group
pub fn wants_favorites(groups: &[Vec<String>]) -> bool {
    let favorite: &str = FacetAttribute::Favorite.as_ref();
    groups
        .iter()
        .flatten()
        .filter_map(|token| token.split_once(':'))
        .any(|(attribute, _)| attribute.trim() == favorite)
}

/// Restrict to favorite records when any token names the `favorite` attribute
pub fn filter_favorites<'a>(
    records: Vec<&'a VideoRecord>,
    groups: &[Vec<String>],
) -> Vec<&'a VideoRecord> {
    if !wants_favorites(groups) {
        return records;
    }
    records.into_iter().filter(|record| record.favorite).collect()
}

/// Compare a requested value set against a record's list values
pub fn list_matches(mode: ChordsSearchMode, requested: &[String], values: &[String]) -> bool {
    let values: HashSet<&str> = values.iter().map(String::as_str).collect();
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();

    match mode {
        ChordsSearchMode::Exact => requested == values,
        ChordsSearchMode::Any => requested.iter().any(|value| values.contains(value)),
        ChordsSearchMode::All => requested.iter().all(|value| values.contains(value)),
        ChordsSearchMode::None => !requested.iter().any(|value| values.contains(value)),
    }
}

/// Apply the non-favorite groups in order, intersecting their results.
///
/// `chords` uses `chords_mode`; other list attributes use `Any`; scalar
/// attributes require membership in the group's values. A group naming an
/// unknown attribute matches nothing.
pub fn apply_facet_filters<'a>(
    records: Vec<&'a VideoRecord>,
    groups: &[FilterGroup],
    chords_mode: ChordsSearchMode,
) -> Vec<&'a VideoRecord> {
    let mut data = records;

    for group in groups.iter().filter(|group| !group.is_favorite()) {
        let attribute = match FacetAttribute::from_str(&group.attribute) {
            Ok(attribute) => attribute,
            Err(_) => {
                warn!(attribute = %group.attribute, "Facet filter on unknown attribute matches nothing");
                return Vec::new();
            }
        };

        let before = data.len();
        data.retain(|record| group_matches(record, attribute, &group.values, chords_mode));
        debug!(
            attribute = %group.attribute,
            values = group.values.len(),
            before,
            after = data.len(),
            "Applied facet filter group"
        );
    }

    data
}

fn group_matches(
    record: &VideoRecord,
    attribute: FacetAttribute,
    values: &[String],
    chords_mode: ChordsSearchMode,
) -> bool {
    if let Some(list) = attribute.list_values(record) {
        let mode = match attribute {
            FacetAttribute::Chords => chords_mode,
            _ => ChordsSearchMode::Any,
        };
        return list_matches(mode, values, list);
    }

    attribute
        .scalar_value(record)
        .map(|scalar| values.iter().any(|value| *value == scalar))
        .unwrap_or(false)
}
