//! Share payloads for greeting-card links.
//!
//! A card personalization is serialized to JSON, then encoded as unpadded
//! URL-safe base64 so the whole card travels inside a link fragment
//! (`#/open?token=...`). This crate owns the payload model, the token codec,
//! and building/reading share links. Rendering the card is the caller's job.

mod base64url;
mod codec;
mod error;
mod link;
mod payload;

pub use base64url::{base64url_decode, base64url_encode};
pub use codec::{decode, decode_payload, encode, encode_payload};
pub use error::{DecodeError, EncodeError, PayloadError};
pub use link::{share_url, token_from_link, OPEN_ROUTE};
pub use payload::{truncate_chars, SharePayload};

/// Payload schema version written by this crate.
pub const SUPPORTED_VERSION: i64 = 1;

/// Maximum characters in the `to` and `from` fields.
pub const MAX_NAME_CHARS: usize = 42;

/// Maximum characters in the `msg` field.
pub const MAX_MESSAGE_CHARS: usize = 160;
