//! Application configuration, read from a JSON file.
//!
//! ```json
//! { "base_url": "https://cards.example/echo", "packs_root": "packs" }
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Deployed origin + path that share links point at. When unset, links
    /// use the origin the app is currently served from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Directory (or URL prefix) the pack tree is served from.
    #[serde(default = "default_packs_root")]
    pub packs_root: PathBuf,
    /// Manifest path, relative to `packs_root`.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

fn default_packs_root() -> PathBuf {
    PathBuf::from(echocard_packs::PACKS_DIR)
}

fn default_manifest_path() -> String {
    "manifest.json".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            packs_root: default_packs_root(),
            manifest_path: default_manifest_path(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), base_url = ?config.base_url, "loaded config");
        Ok(config)
    }

    /// Base for share links: the configured `base_url`, else `current_origin`.
    pub fn share_base<'a>(&'a self, current_origin: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(current_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.packs_root, PathBuf::from("packs"));
        assert_eq!(config.manifest_path, "manifest.json");
    }

    #[test]
    fn share_base_prefers_configured_url() {
        let config =
            AppConfig::from_json_str(r#"{ "base_url": "https://cards.example/echo" }"#).unwrap();
        assert_eq!(config.share_base("http://localhost:8000/"), "https://cards.example/echo");
    }

    #[test]
    fn share_base_falls_back_to_origin() {
        let config = AppConfig::from_json_str(r#"{ "base_url": "  " }"#).unwrap();
        assert_eq!(config.share_base("http://localhost:8000/"), "http://localhost:8000/");
        assert_eq!(
            AppConfig::default().share_base("http://localhost:8000/"),
            "http://localhost:8000/"
        );
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = AppConfig::from_json_str(r#"{ "base_url": 5 }"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "packs_root": "/srv/packs", "manifest_path": "index.json" }}"#).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.packs_root, PathBuf::from("/srv/packs"));
        assert_eq!(config.manifest_path, "index.json");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
