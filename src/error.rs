use std::path::PathBuf;

use echocard_packs::PackError;
use echocard_share::{DecodeError, EncodeError};
use thiserror::Error;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid link: {0}")]
    InvalidLink(#[from] DecodeError),

    #[error("Invalid link: no share token found")]
    MissingToken,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Failed to serialize stickers: {0}")]
    Stickers(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    pub(crate) fn pack_not_found(pack_id: &str) -> Self {
        AppError::NotFound(format!("pack `{pack_id}`"))
    }

    pub(crate) fn card_not_found(pack_id: &str, card_id: &str) -> Self {
        AppError::NotFound(format!("card `{card_id}` in pack `{pack_id}`"))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
