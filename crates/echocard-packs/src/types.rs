use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One entry of `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestEntry {
    pub id: String,
    #[serde(rename = "packPath")]
    pub pack_path: String,
}

impl ManifestEntry {
    /// Directory holding the pack's files: the first segment of
    /// `packPath` (`anti_love/pack.json` → `anti_love`).
    pub fn pack_dir(&self) -> &str {
        self.pack_path
            .split('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(self.id.as_str())
    }
}

/// Contents of a pack's `pack.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assets: PackAssets,
    pub data: PackDataPaths,
}

impl PackDefinition {
    pub fn display_name<'a>(&'a self, pack_id: &'a str) -> &'a str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(pack_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackAssets {
    #[serde(default)]
    pub box_art: Option<String>,
}

/// Pack-relative paths of the data files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackDataPaths {
    pub cards: String,
    pub stickers: String,
    /// Packs without music omit this.
    #[serde(default)]
    pub tracks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Older packs name the image `front_svg`.
    #[serde(default)]
    pub front_svg: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
}

impl CardRecord {
    /// Pack-relative image path, or empty if the card has none.
    pub fn image(&self) -> &str {
        self.front_svg
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.src.as_deref())
            .unwrap_or_default()
    }
}

/// A sticker from a pack's sticker list. Only `src` is interpreted here;
/// any placement fields ride along in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StickerAsset {
    #[serde(default)]
    pub src: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackRecord {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
}

impl TrackRecord {
    /// Identifier stored in a share payload's `track` field.
    pub fn key(&self) -> &str {
        first_non_empty([self.id.as_deref(), self.title.as_deref()])
    }

    pub fn display_title(&self) -> &str {
        match first_non_empty([self.title.as_deref(), self.name.as_deref()]) {
            "" => "Untitled",
            title => title,
        }
    }

    /// Audio path (pack-relative or absolute), or empty.
    pub fn source(&self) -> &str {
        first_non_empty([self.src.as_deref(), self.url.as_deref(), self.file.as_deref()])
    }
}

fn first_non_empty<const N: usize>(candidates: [Option<&str>; N]) -> &str {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Everything loaded for one pack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackData {
    pub cards: Vec<CardRecord>,
    pub stickers: Vec<StickerAsset>,
    pub tracks: Vec<TrackRecord>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
