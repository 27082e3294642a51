use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{DecodeError, PayloadError};
use crate::{MAX_MESSAGE_CHARS, MAX_NAME_CHARS, SUPPORTED_VERSION};

/// Everything needed to rebuild a card on the recipient's side.
///
/// Field names are the wire names. Decoding is lenient: missing or `null`
/// fields read as empty, numbers and booleans in text fields read as their
/// JSON text, and `v`/`ts` accept any JSON number. Fields this version does
/// not know about are kept in `extra` and written back out on encode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharePayload {
    /// Schema version.
    #[serde(deserialize_with = "lenient_int")]
    pub v: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub pack: String,
    #[serde(deserialize_with = "lenient_string")]
    pub card: String,
    #[serde(deserialize_with = "lenient_string")]
    pub to: String,
    #[serde(deserialize_with = "lenient_string")]
    pub from: String,
    #[serde(deserialize_with = "lenient_string")]
    pub msg: String,
    /// JSON-encoded array of sticker placements, or empty.
    #[serde(deserialize_with = "lenient_string")]
    pub sticker: String,
    #[serde(deserialize_with = "lenient_string")]
    pub track: String,
    /// Relative path to the envelope seal image, or empty.
    #[serde(deserialize_with = "lenient_string")]
    pub seal: String,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(deserialize_with = "lenient_int")]
    pub ts: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Integers as-is; other numbers truncated (saturating at the `i64`
/// bounds); anything else is 0.
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Number(n) = Value::deserialize(deserializer)? else {
        return Ok(0);
    };
    let int = n
        .as_i64()
        .or_else(|| n.as_u64().map(|_| i64::MAX))
        .or_else(|| n.as_f64().map(|f| f as i64));
    Ok(int.unwrap_or_default())
}

impl SharePayload {
    /// A current-version payload for the given pack and card with every
    /// optional field empty.
    pub fn new(pack: impl Into<String>, card: impl Into<String>) -> Self {
        Self {
            v: SUPPORTED_VERSION,
            pack: pack.into(),
            card: card.into(),
            ..Default::default()
        }
    }

    /// Map decoded token JSON onto a payload without checking its contents.
    ///
    /// # Errors
    /// `DecodeError::NotAnObject` for non-object JSON.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        if !value.is_object() {
            return Err(DecodeError::NotAnObject);
        }
        serde_json::from_value(value).map_err(DecodeError::Payload)
    }

    pub fn is_current_version(&self) -> bool {
        self.v == SUPPORTED_VERSION
    }

    /// Check the constraints a well-formed payload satisfies.
    ///
    /// The codec never calls this; consumers decide what to do with a
    /// payload that decodes but is incomplete.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.pack.is_empty() {
            return Err(PayloadError::MissingField { field: "pack" });
        }
        if self.card.is_empty() {
            return Err(PayloadError::MissingField { field: "card" });
        }
        check_len("to", &self.to, MAX_NAME_CHARS)?;
        check_len("from", &self.from, MAX_NAME_CHARS)?;
        check_len("msg", &self.msg, MAX_MESSAGE_CHARS)?;
        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), PayloadError> {
    let len = value.chars().count();
    if len > max {
        return Err(PayloadError::TooLong { field, len, max });
    }
    Ok(())
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default_to_empty() {
        let payload = SharePayload::from_value(json!({ "v": 1, "card": "c1" })).unwrap();
        assert_eq!(payload.pack, "");
        assert_eq!(payload.card, "c1");
        assert_eq!(payload.ts, 0);
        assert!(payload.extra.is_empty());
    }

    #[test]
    fn unknown_fields_are_kept() {
        let payload =
            SharePayload::from_value(json!({ "v": 2, "pack": "p", "card": "c", "font": "serif" }))
                .unwrap();
        assert_eq!(payload.extra.get("font"), Some(&json!("serif")));
        assert!(!payload.is_current_version());

        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back["font"], json!("serif"));
    }

    #[test]
    fn rejects_non_object() {
        let err = SharePayload::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject));
    }

    #[test]
    fn tolerates_loose_field_types() {
        let payload = SharePayload::from_value(json!({
            "v": -1,
            "pack": 7,
            "card": "c1",
            "seal": null,
            "track": ["t1"],
            "msg": true,
            "ts": 1.7e12
        }))
        .unwrap();
        assert_eq!(payload.v, -1);
        assert_eq!(payload.pack, "7");
        assert_eq!(payload.seal, "");
        assert_eq!(payload.track, "");
        assert_eq!(payload.msg, "true");
        assert_eq!(payload.ts, 1_700_000_000_000);
        assert!(payload.extra.is_empty());
    }

    #[test]
    fn out_of_range_numbers_saturate() {
        let payload = SharePayload::from_value(json!({
            "v": "1",
            "ts": u64::MAX
        }))
        .unwrap();
        assert_eq!(payload.v, 0);
        assert_eq!(payload.ts, i64::MAX);

        let payload = SharePayload::from_value(json!({ "ts": -1e300 })).unwrap();
        assert_eq!(payload.ts, i64::MIN);
    }

    #[test]
    fn wire_field_order() {
        let payload = SharePayload::new("p", "c");
        let text = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            text,
            r#"{"v":1,"pack":"p","card":"c","to":"","from":"","msg":"","sticker":"","track":"","seal":"","ts":0}"#
        );
    }

    #[test]
    fn validate_accepts_complete_payload() {
        let mut payload = SharePayload::new("anti_love", "c1");
        payload.to = "Sam".into();
        payload.msg = "x".repeat(MAX_MESSAGE_CHARS);
        assert_eq!(payload.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_missing_pack_and_card() {
        assert_eq!(
            SharePayload::new("", "c1").validate(),
            Err(PayloadError::MissingField { field: "pack" })
        );
        assert_eq!(
            SharePayload::new("p", "").validate(),
            Err(PayloadError::MissingField { field: "card" })
        );
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let mut payload = SharePayload::new("p", "c");
        payload.from = "é".repeat(MAX_NAME_CHARS);
        assert_eq!(payload.validate(), Ok(()));

        payload.from.push('é');
        assert_eq!(
            payload.validate(),
            Err(PayloadError::TooLong {
                field: "from",
                len: 43,
                max: 42
            })
        );
    }

    #[test]
    fn truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 42), "hi");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("💌💌💌", 1), "💌");
    }
}
