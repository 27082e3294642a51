//! Where pack files come from.
//!
//! The app only needs "give me the JSON at this pack-relative path".
//! [`FsPackSource`] reads a pack tree from disk; [`MemoryPackSource`] serves
//! files already held in memory (tests, prefetched bundles).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to load {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load {path}: not found")]
    NotFound { path: String },
}

/// Loader for pack JSON files. Paths are relative to the packs root, e.g.
/// `manifest.json` or `anti_love/cards.json`.
#[async_trait]
pub trait PackSource: Send + Sync {
    async fn load_json(&self, path: &str) -> Result<Value, SourceError>;
}

/// Reads pack files from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsPackSource {
    root: PathBuf,
}

impl FsPackSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.packs_root.clone())
    }
}

#[async_trait]
impl PackSource for FsPackSource {
    async fn load_json(&self, path: &str) -> Result<Value, SourceError> {
        let full = self.root.join(path);
        let bytes = tokio::fs::read(&full).await.map_err(|source| SourceError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Json {
            path: path.to_string(),
            source,
        })
    }
}

/// Serves pack files from memory and counts loads.
#[derive(Debug, Default)]
pub struct MemoryPackSource {
    files: HashMap<String, Value>,
    loads: AtomicUsize,
}

impl MemoryPackSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, json: Value) -> Self {
        self.files.insert(path.into(), json);
        self
    }

    /// Number of `load_json` calls served so far, including misses.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PackSource for MemoryPackSource {
    async fn load_json(&self, path: &str) -> Result<Value, SourceError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                path: path.to_string(),
            })
    }
}
