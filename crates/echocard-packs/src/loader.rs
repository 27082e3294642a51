//! Parsing of the JSON files a pack ships.
//!
//! Data files come in two shapes: a bare array, or an object wrapping the
//! array under the list's name (`{ "cards": [...] }`). Both are accepted.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PackError;
use crate::types::{CardRecord, ManifestEntry, PackData, PackDefinition, StickerAsset, TrackRecord};

/// Parse `manifest.json`. Entries without an `id` or `packPath` are skipped.
pub fn parse_manifest(json: &Value) -> Result<Vec<ManifestEntry>, PackError> {
    let obj = json
        .as_object()
        .ok_or(PackError::NotAnObject { what: "manifest" })?;

    let Some(items) = obj.get("packs").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let entries = items
        .iter()
        .filter_map(|item| {
            let id = non_empty_str(item, "id");
            let pack_path = non_empty_str(item, "packPath");
            match (id, pack_path) {
                (Some(id), Some(pack_path)) => Some(ManifestEntry {
                    id: id.to_string(),
                    pack_path: pack_path.to_string(),
                }),
                _ => {
                    tracing::warn!(entry = %item, "skipping pack: missing id or packPath");
                    None
                }
            }
        })
        .collect();
    Ok(entries)
}

fn non_empty_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Parse a pack's `pack.json`.
pub fn parse_pack_definition(json: &Value) -> Result<PackDefinition, PackError> {
    if !json.is_object() {
        return Err(PackError::NotAnObject {
            what: "pack definition",
        });
    }
    serde_json::from_value(json.clone()).map_err(PackError::InvalidDefinition)
}

/// Parse a data list in either accepted shape.
///
/// An object without the key is an empty list. Individual entries that do
/// not deserialize are skipped with a warning.
pub fn parse_list<T: DeserializeOwned>(
    json: &Value,
    key: &'static str,
) -> Result<Vec<T>, PackError> {
    let items = match json {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get(key) {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(_) => return Err(PackError::UnexpectedListShape { key }),
        },
        _ => return Err(PackError::UnexpectedListShape { key }),
    };

    let parsed = items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(list = key, error = %e, "skipping malformed pack entry");
                None
            }
        })
        .collect();
    Ok(parsed)
}

impl PackData {
    /// Build pack data from the loaded data files. `tracks` is `None` when
    /// the pack has no track list or it failed to load.
    pub fn from_json(
        cards: &Value,
        stickers: &Value,
        tracks: Option<&Value>,
    ) -> Result<Self, PackError> {
        let tracks = match tracks {
            Some(json) => parse_list::<TrackRecord>(json, "tracks")?,
            None => Vec::new(),
        };
        Ok(Self {
            cards: parse_list::<CardRecord>(cards, "cards")?,
            stickers: parse_list::<StickerAsset>(stickers, "stickers")?,
            tracks,
        })
    }
}
