use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid share token: not URL-safe base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid share token: decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid share token: decoded text is not JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Invalid share payload: expected object")]
    NotAnObject,

    #[error("Invalid share payload: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Serialization failure while building a share token.
#[derive(Debug, Error)]
#[error("Failed to serialize share payload: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Invalid share payload: missing {field}")]
    MissingField { field: &'static str },

    #[error("Invalid share payload: {field} is {len} characters (max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
