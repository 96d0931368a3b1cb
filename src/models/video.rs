use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

/// A catalog row as published by the data pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoEntry {
    /// Unique video identifier
    pub id: String,

    /// Song title extracted from the video title
    #[serde(default, deserialize_with = "lenient_string")]
    pub track: String,

    /// Original video title
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    /// Channel display name
    #[serde(default, deserialize_with = "lenient_string")]
    pub uploader: String,

    /// Channel identifier
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel: String,

    /// Album or film, empty when unknown
    #[serde(default, deserialize_with = "lenient_string")]
    pub album: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub language: String,

    /// Upload date as `YYYYMMDD` (or any lexicographically sortable form)
    #[serde(default, deserialize_with = "lenient_string")]
    pub upload_date: String,

    /// Musical key
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: String,

    /// Publish flag, 1 = published
    #[serde(default, deserialize_with = "lenient_flag")]
    pub publish: i64,

    #[serde(default, deserialize_with = "lenient_list")]
    pub artists: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub composers: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub chords: Vec<String>,

    /// Whether the tutorial uses baritone tuning
    #[serde(default, deserialize_with = "lenient_bool")]
    pub baritone: bool,

    /// Loop start in seconds
    #[serde(default)]
    pub loop_start: Option<f64>,

    /// Loop end in seconds
    #[serde(default)]
    pub loop_end: Option<f64>,

    /// Comma separated ids of other versions of the same song
    #[serde(default, deserialize_with = "lenient_string")]
    pub id_related: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
pub enum Tuning {
    Standard,
    Baritone,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
pub enum PublishState {
    Published,
    Unpublished,
}

/// A catalog entry with its derived search fields.
///
/// Built once when a search session is created and never mutated afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoRecord {
    #[serde(flatten)]
    pub entry: VideoEntry,

    #[serde(rename = "objectID")]
    pub object_id: String,

    #[serde(rename = "chordCount")]
    pub chord_count: usize,

    pub tuning: Tuning,

    pub favorite: bool,

    pub published: PublishState,
}

impl VideoRecord {
    /// Derive the search fields for a catalog entry
    pub fn augment(entry: VideoEntry, favorites: &HashMap<String, bool>) -> Self {
        let favorite = favorites.get(&entry.id).copied().unwrap_or(false);
        let tuning = if entry.baritone {
            Tuning::Baritone
        } else {
            Tuning::Standard
        };
        let published = if entry.publish == 1 {
            PublishState::Published
        } else {
            PublishState::Unpublished
        };

        Self {
            object_id: entry.id.clone(),
            chord_count: entry.chords.len(),
            tuning,
            favorite,
            published,
            entry,
        }
    }

    pub fn id(&self) -> &str {
        &self.object_id
    }

    /// Ids of the other versions of this song, excluding this record
    pub fn related_ids(&self) -> impl Iterator<Item = &str> {
        self.entry
            .id_related
            .split(',')
            .map(str::trim)
            .filter(move |id| !id.is_empty() && *id != self.object_id)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(0),
        Some(serde_json::Value::Bool(b)) => Ok(i64::from(b)),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::custom(format!("invalid flag: {}", n))),
        Some(other) => Err(D::Error::custom(format!("invalid flag: {}", other))),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_flag(deserializer).map(|flag| flag != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, chords: &[&str]) -> VideoEntry {
        VideoEntry {
            id: id.to_string(),
            track: format!("Song {}", id),
            chords: chords.iter().map(|c| c.to_string()).collect(),
            publish: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_augment_derives_fields() {
        let mut favorites = HashMap::new();
        favorites.insert("a".to_string(), true);

        let record = VideoRecord::augment(entry("a", &["C", "G", "Am"]), &favorites);

        assert_eq!(record.object_id, "a");
        assert_eq!(record.chord_count, 3);
        assert_eq!(record.tuning, Tuning::Standard);
        assert!(record.favorite);
        assert_eq!(record.published, PublishState::Published);
    }

    #[test]
    fn test_missing_favorite_defaults_to_false() {
        let mut e = entry("b", &[]);
        e.baritone = true;
        e.publish = 0;

        let record = VideoRecord::augment(e, &HashMap::new());

        assert!(!record.favorite);
        assert_eq!(record.tuning, Tuning::Baritone);
        assert_eq!(record.published, PublishState::Unpublished);
        assert_eq!(record.chord_count, 0);
    }

    #[test]
    fn test_deserialize_pipeline_row() {
        let row = r#"{
            "publish": 1, "ignore": 0, "id": "abc", "track": "Tum Hi Ho",
            "chords": ["Am", "F"], "key": null, "album": null,
            "artists": ["Arijit Singh"], "composers": [], "language": "Hindi",
            "loop_start": 0, "loop_end": 312.5, "title": "Tum Hi Ho ukulele tutorial",
            "channel": "UC1", "upload_date": 20210101, "uploader": "Uke Channel",
            "id_related": null, "baritone": 0
        }"#;

        let entry: VideoEntry = serde_json::from_str(row).unwrap();

        assert_eq!(entry.upload_date, "20210101");
        assert_eq!(entry.album, "");
        assert!(!entry.baritone);
        assert_eq!(entry.loop_end, Some(312.5));
    }

    #[test]
    fn test_serialized_record_carries_derived_fields() {
        let record = VideoRecord::augment(entry("a", &["C"]), &HashMap::new());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["objectID"], "a");
        assert_eq!(json["chordCount"], 1);
        assert_eq!(json["tuning"], "Standard");
        assert_eq!(json["published"], "Published");
        assert_eq!(json["track"], "Song a");
    }

    #[test]
    fn test_related_ids_exclude_self() {
        let mut e = entry("a", &[]);
        e.id_related = "a,b, c,".to_string();
        let record = VideoRecord::augment(e, &HashMap::new());

        assert_eq!(record.related_ids().collect::<Vec<_>>(), vec!["b", "c"]);
    }
}
