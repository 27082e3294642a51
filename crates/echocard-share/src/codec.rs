//! Token codec: JSON → UTF-8 → unpadded URL-safe base64, and back.

use serde::Serialize;
use serde_json::Value;

use crate::base64url::{base64url_decode, base64url_encode};
use crate::error::{DecodeError, EncodeError};
use crate::payload::SharePayload;

/// Encode any serializable value as a share token.
///
/// The token only contains `[A-Za-z0-9_-]` and is deterministic for a given
/// value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, EncodeError> {
    let json = serde_json::to_vec(value)?;
    Ok(base64url_encode(&json))
}

/// Decode a share token into its JSON value.
///
/// No schema validation happens here: any valid JSON is returned as-is.
///
/// # Errors
/// Returns `DecodeError` if the token is not URL-safe base64, the bytes are
/// not UTF-8, or the text is not JSON.
pub fn decode(token: &str) -> Result<Value, DecodeError> {
    let result = decode_inner(token);
    if let Err(e) = &result {
        tracing::debug!(token_len = token.len(), error = %e, "share token rejected");
    }
    result
}

fn decode_inner(token: &str) -> Result<Value, DecodeError> {
    let bytes = base64url_decode(token)?;
    let text = String::from_utf8(bytes)?;
    serde_json::from_str(&text).map_err(DecodeError::Json)
}

pub fn encode_payload(payload: &SharePayload) -> Result<String, EncodeError> {
    encode(payload)
}

/// Decode a share token straight into a [`SharePayload`].
pub fn decode_payload(token: &str) -> Result<SharePayload, DecodeError> {
    SharePayload::from_value(decode(token)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base64url_encode;
    use serde_json::json;

    fn anti_love() -> SharePayload {
        SharePayload {
            v: 1,
            pack: "anti_love".into(),
            card: "c1".into(),
            to: "Sam".into(),
            from: "Lee".into(),
            msg: "hi".into(),
            sticker: String::new(),
            track: String::new(),
            seal: String::new(),
            ts: 1_700_000_000_000,
            extra: Default::default(),
        }
    }

    fn is_url_safe(token: &str) -> bool {
        token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    #[test]
    fn end_to_end_round_trip() {
        let payload = anti_love();
        let token = encode_payload(&payload).unwrap();
        assert_eq!(decode_payload(&token).unwrap(), payload);

        let raw = decode(&token).unwrap();
        assert_eq!(
            raw,
            json!({
                "v": 1, "pack": "anti_love", "card": "c1", "to": "Sam", "from": "Lee",
                "msg": "hi", "sticker": "", "track": "", "seal": "", "ts": 1700000000000i64
            })
        );
    }

    #[test]
    fn unicode_round_trip() {
        let mut payload = anti_love();
        payload.to = "Zoë".into();
        payload.from = "渡辺".into();
        payload.msg = "Je t'aime 💘 — toujours".into();
        payload.sticker = r#"[{"src":"st/heart.svg","packId":null,"xp":0.5,"yp":0.5}]"#.into();
        let token = encode_payload(&payload).unwrap();
        assert!(is_url_safe(&token));
        assert_eq!(decode_payload(&token).unwrap(), payload);
    }

    #[test]
    fn token_is_url_safe() {
        // "?>" and "~~~" in the message force 62/63 sextets into the output.
        let mut payload = anti_love();
        for msg in ["?>?>?>", "~~~", "ÿÿÿ", "a", "ab", "abc"] {
            payload.msg = msg.into();
            let token = encode_payload(&payload).unwrap();
            assert!(!token.is_empty());
            assert!(is_url_safe(&token), "unsafe token {token}");
        }
    }

    #[test]
    fn encode_is_deterministic() {
        let payload = anti_love();
        assert_eq!(
            encode_payload(&payload).unwrap(),
            encode_payload(&payload).unwrap()
        );
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        let token = encode_payload(&anti_love()).unwrap();
        for bad in [format!("{token}!"), format!("+{token}"), format!("{token}/"), "a b".into()] {
            let err = decode(&bad).unwrap_err();
            assert!(matches!(err, DecodeError::Base64(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn rejects_non_json() {
        let token = base64url_encode(b"not json at all");
        let err = decode(&token).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(err.to_string().contains("not JSON"));
    }

    #[test]
    fn rejects_empty_token() {
        assert!(matches!(decode("").unwrap_err(), DecodeError::Json(_)));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let token = base64url_encode(&[0xff, 0xfe, 0x22]);
        assert!(matches!(decode(&token).unwrap_err(), DecodeError::Utf8(_)));
    }

    #[test]
    fn passes_through_incomplete_payload() {
        let token = encode(&json!({ "v": 1, "card": "c1" })).unwrap();
        let raw = decode(&token).unwrap();
        assert_eq!(raw, json!({ "v": 1, "card": "c1" }));

        let payload = decode_payload(&token).unwrap();
        assert_eq!(payload.pack, "");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn passes_through_other_versions() {
        let token = encode(&json!({ "v": 7, "pack": "p", "card": "c" })).unwrap();
        let payload = decode_payload(&token).unwrap();
        assert_eq!(payload.v, 7);
        assert!(!payload.is_current_version());
    }
}
