//! Search request types and facet filter parsing

use crate::models::VideoRecord;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::debug;

/// Combination mode for the `chords` facet
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChordsSearchMode {
    /// Record's value set equals the requested set
    #[default]
    Exact,
    /// At least one requested value present
    Any,
    /// Every requested value present
    All,
    /// No requested value present
    None,
}

/// Sort order selected by the request's index name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Newest upload first
    UploadDate,
    /// Track title, ascending
    Track,
}

impl SortMode {
    pub fn from_index_name(index_name: &str) -> Self {
        match index_name {
            "upload_date" => SortMode::UploadDate,
            _ => SortMode::Track,
        }
    }
}

/// Attributes exposed for faceting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum FacetAttribute {
    Artists,
    Chords,
    Uploader,
    ChordCount,
    Album,
    Tuning,
    Language,
    Published,
    Favorite,
}

impl FacetAttribute {
    /// List-valued attributes counted per value
    pub const LIST: [FacetAttribute; 2] = [FacetAttribute::Artists, FacetAttribute::Chords];

    /// Single-valued attributes counted per record
    pub const SCALAR: [FacetAttribute; 6] = [
        FacetAttribute::Uploader,
        FacetAttribute::ChordCount,
        FacetAttribute::Album,
        FacetAttribute::Tuning,
        FacetAttribute::Language,
        FacetAttribute::Published,
    ];

    pub fn is_list(&self) -> bool {
        matches!(self, FacetAttribute::Artists | FacetAttribute::Chords)
    }

    /// Values of a list attribute, `None` for scalar attributes
    pub fn list_values<'a>(&self, record: &'a VideoRecord) -> Option<&'a [String]> {
        match self {
            FacetAttribute::Artists => Some(&record.entry.artists),
            FacetAttribute::Chords => Some(&record.entry.chords),
            _ => None,
        }
    }

    /// String form of a scalar attribute, `None` for list attributes and for
    /// `favorite`, which is handled by the favorites pre-filter
    pub fn scalar_value(&self, record: &VideoRecord) -> Option<String> {
        match self {
            FacetAttribute::Uploader => Some(record.entry.uploader.clone()),
            FacetAttribute::ChordCount => Some(record.chord_count.to_string()),
            FacetAttribute::Album => Some(record.entry.album.clone()),
            FacetAttribute::Tuning => Some(record.tuning.to_string()),
            FacetAttribute::Language => Some(record.entry.language.clone()),
            FacetAttribute::Published => Some(record.published.to_string()),
            FacetAttribute::Favorite | FacetAttribute::Artists | FacetAttribute::Chords => None,
        }
    }
}

/// One AND term of a facet filter: the record must match any of `values`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGroup {
    pub attribute: String,
    pub values: Vec<String>,
}

impl FilterGroup {
    /// Parse a group of `attribute:value` tokens.
    ///
    /// Tokens without a `:` are skipped. The attribute comes from the first
    /// well-formed token; `None` when no token is well-formed.
    pub fn parse(tokens: &[String]) -> Option<Self> {
        let mut attribute = None;
        let mut values = Vec::with_capacity(tokens.len());

        for token in tokens {
            match token.split_once(':') {
                Some((attr, value)) => {
                    attribute.get_or_insert_with(|| attr.trim().to_string());
                    values.push(value.to_string());
                }
                None => debug!(token = %token, "Skipping malformed facet filter token"),
            }
        }

        attribute.map(|attribute| Self { attribute, values })
    }

    pub fn is_favorite(&self) -> bool {
        let favorite: &str = FacetAttribute::Favorite.as_ref();
        self.attribute == favorite
    }
}

/// Parse every group of a `facetFilters` parameter, dropping empty groups
pub fn parse_facet_filters(groups: &[Vec<String>]) -> Vec<FilterGroup> {
    groups
        .iter()
        .filter_map(|tokens| FilterGroup::parse(tokens))
        .collect()
}

/// Query parameters of a single search request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Text matched against track and title
    #[serde(default)]
    pub query: String,

    /// Zero-based page index
    #[serde(default)]
    pub page: Option<usize>,

    #[serde(default)]
    pub hits_per_page: Option<usize>,

    /// Outer list is AND, inner lists are OR
    #[serde(default, deserialize_with = "deserialize_facet_filters")]
    pub facet_filters: Vec<Vec<String>>,

    /// `attribute operator number` clauses, AND'd
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub numeric_filters: Vec<String>,
}

/// A single entry of a multi-index search call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub params: SearchParams,

    /// Index name, also selects the sort order
    #[serde(default)]
    pub index_name: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            params: SearchParams {
                query: query.into(),
                ..Default::default()
            },
            index_name: None,
        }
    }

    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.params.page = Some(page);
        self
    }

    pub fn with_hits_per_page(mut self, hits_per_page: usize) -> Self {
        self.params.hits_per_page = Some(hits_per_page);
        self
    }

    /// Add an OR group of `attribute:value` tokens
    pub fn with_facet_group(mut self, tokens: Vec<impl Into<String>>) -> Self {
        self.params
            .facet_filters
            .push(tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_numeric_filter(mut self, clause: impl Into<String>) -> Self {
        self.params.numeric_filters.push(clause.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetValuesParams {
    pub facet_name: String,

    #[serde(default)]
    pub facet_query: String,
}

/// A single entry of a facet value search call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetValuesRequest {
    pub params: FacetValuesParams,
}

impl FacetValuesRequest {
    pub fn new(facet_name: impl Into<String>, facet_query: impl Into<String>) -> Self {
        Self {
            params: FacetValuesParams {
                facet_name: facet_name.into(),
                facet_query: facet_query.into(),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FacetFilterItem {
    Token(String),
    Group(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FacetFilterParam {
    Single(String),
    List(Vec<FacetFilterItem>),
}

/// Accepts `"a:b"`, `["a:b", "c:d"]` and `[["a:b", "a:c"], "c:d"]`.
/// A bare string is its own AND group.
fn deserialize_facet_filters<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let groups = match Option::<FacetFilterParam>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(FacetFilterParam::Single(token)) => vec![vec![token]],
        Some(FacetFilterParam::List(items)) => items
            .into_iter()
            .map(|item| match item {
                FacetFilterItem::Token(token) => vec![token],
                FacetFilterItem::Group(group) => group,
            })
            .collect(),
    };
    Ok(groups)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrVec {
    Single(String),
    List(Vec<String>),
}

fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrVec>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrVec::Single(s)) => vec![s],
        Some(StringOrVec::List(list)) => list,
    })
}
