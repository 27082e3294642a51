//! The payload's `sticker` field: a JSON array stored as a string.

use serde_json::Value;

use crate::types::StickerPlacement;

/// Read raw sticker records out of a payload's `sticker` string.
///
/// Empty means no stickers. Text that is not a JSON array is logged and
/// treated as no stickers; a missing decoration never blocks a card.
pub fn parse_sticker_field(field: &str) -> Vec<Value> {
    if field.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(field) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "sticker field is not an array; ignoring");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "sticker field is not valid JSON; ignoring");
            Vec::new()
        }
    }
}

/// Serialize placements for a payload's `sticker` field. No stickers
/// encodes as the empty string.
pub fn encode_sticker_field(placements: &[StickerPlacement]) -> Result<String, serde_json::Error> {
    if placements.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(placements)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
