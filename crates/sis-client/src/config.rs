//! Client configuration.
//!
//! Settings live in `sis.toml` in the platform config folder:
//! - Linux: ~/.config/sis/
//! - macOS: ~/Library/Application Support/edu.sis.SIS/
//! - Windows: %APPDATA%/sis/SIS/config/
//!
//! `SIS_BASE_URL` overrides the backend address after the file is read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

const APP_QUALIFIER: &str = "edu";
const APP_ORG: &str = "sis";
const APP_NAME: &str = "SIS";
const CONFIG_FILENAME: &str = "sis.toml";

/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "SIS_BASE_URL";

/// Backend address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Request timeout used when nothing is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bucket holding profile images.
pub const DEFAULT_BUCKET: &str = "profile";

/// Settings for the REST backend and the attachment store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root, without the `/api` suffix.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Attachment storage.
    pub storage: StorageConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage: StorageConfig::default(),
        }
    }
}

/// Object-storage settings. Uploads are disabled while `base_url` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage service root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Bucket name.
    pub bucket: String,
    /// Service key sent as `apikey` and bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            bucket: DEFAULT_BUCKET.to_string(),
            api_key: None,
        }
    }
}

impl StorageConfig {
    /// True when uploads can be attempted.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.base_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

impl ClientConfig {
    /// Path of the default config file, if the platform has a config folder.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default file is read if
    /// present and defaults are used otherwise. The environment override is
    /// applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => match Self::config_path() {
                Some(path) if path.is_file() => Self::load_from(&path)?,
                Some(path) => {
                    tracing::debug!("No config file at {:?}, using defaults", path);
                    Self::default()
                }
                None => {
                    tracing::warn!("Could not determine config path, using defaults");
                    Self::default()
                }
            },
        };
        Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::parse(&content)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        tracing::info!("Loaded client config from {:?}", path);
        Ok(config)
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Replace the backend address when `value` is non-blank.
    #[must_use]
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Using backend address from {}", BASE_URL_ENV);
            self.base_url = url.trim().to_string();
        }
        self
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Backend root without a trailing slash.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.storage.bucket, "profile");
        assert!(!config.storage.is_configured());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ClientConfig::parse(
            r#"
            base_url = "https://sis.example.edu/"

            [storage]
            base_url = "https://storage.example.edu"
            api_key = "anon"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_root(), "https://sis.example.edu/api");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.storage.bucket, DEFAULT_BUCKET);
        assert!(config.storage.is_configured());
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::default().with_base_url_override(Some(" http://10.0.0.2:5000 ".into()));
        assert_eq!(config.base_url, "http://10.0.0.2:5000");

        let config = ClientConfig::default().with_base_url_override(Some("  ".into()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = ClientConfig::load_from(Path::new("/nonexistent/sis.toml"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_round_trip() {
        let config = ClientConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(ClientConfig::parse(&text).unwrap(), config);
    }
}
