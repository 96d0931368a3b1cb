//! Facet value counts and numeric facet stats

use crate::models::VideoRecord;
use crate::search::query::FacetAttribute;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label used for empty list values
pub const UNKNOWN_VALUE: &str = "Unknown";

/// Value -> number of records carrying it
pub type FacetCounts = BTreeMap<String, usize>;

/// Attribute name -> value counts
pub type FacetTable = BTreeMap<String, FacetCounts>;

/// Min/max over the numeric values of a facet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FacetStats {
    pub min: i64,
    pub max: i64,
}

/// Count every tracked attribute over `records`
pub fn count_facets(records: &[&VideoRecord]) -> FacetTable {
    let mut table = FacetTable::new();

    for attribute in FacetAttribute::LIST {
        table.insert(attribute.to_string(), count_list(records, attribute));
    }
    for attribute in FacetAttribute::SCALAR {
        table.insert(attribute.to_string(), count_scalar(records, attribute));
    }

    table
}

/// Each record counts once per distinct value; records without values are skipped
fn count_list(records: &[&VideoRecord], attribute: FacetAttribute) -> FacetCounts {
    let mut counts = FacetCounts::new();

    for values in records.iter().filter_map(|record| attribute.list_values(record)) {
        let distinct: BTreeSet<&str> = values
            .iter()
            .map(|value| {
                if value.is_empty() {
                    UNKNOWN_VALUE
                } else {
                    value.as_str()
                }
            })
            .collect();

        for value in distinct {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    counts
}

/// One increment per record; empty albums are not counted
fn count_scalar(records: &[&VideoRecord], attribute: FacetAttribute) -> FacetCounts {
    let mut counts = FacetCounts::new();

    for value in records.iter().filter_map(|record| attribute.scalar_value(record)) {
        if attribute == FacetAttribute::Album && value.is_empty() {
            continue;
        }
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
}

/// Min/max over the numeric keys of the `chordCount` table.
///
/// The attribute is absent from the result when it has no numeric keys.
pub fn facet_stats(table: &FacetTable) -> BTreeMap<String, FacetStats> {
    let attribute = FacetAttribute::ChordCount.to_string();
    let mut stats = BTreeMap::new();

    let Some(counts) = table.get(&attribute) else {
        return stats;
    };

    let bounds = counts
        .keys()
        .filter_map(|key| key.parse::<i64>().ok())
        .fold(None, |acc: Option<FacetStats>, value| {
            Some(match acc {
                Some(s) => FacetStats {
                    min: s.min.min(value),
                    max: s.max.max(value),
                },
                None => FacetStats {
                    min: value,
                    max: value,
                },
            })
        });

    if let Some(bounds) = bounds {
        stats.insert(attribute, bounds);
    }
    stats
}
