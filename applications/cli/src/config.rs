/// Application configuration
use crate::error::{AppError, Result};
use bucket_catalog::{CatalogConfig, RefetchPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public bucket used when nothing else is configured
pub const DEFAULT_BUCKET_URL: &str = "https://sampliopublicmusic.s3.us-west-2.amazonaws.com";

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "bucket-player.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_bucket_url")]
    pub bucket_url: String,

    #[serde(default = "default_max_keys")]
    pub max_keys: u32,

    /// Give up on listings still truncated after this many pages
    #[serde(default = "default_max_pages")]
    pub max_pages: Option<u32>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Reuse the last full listing when the search box is cleared
    #[serde(default)]
    pub cache_unfiltered: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Start sessions with shuffle on
    #[serde(default)]
    pub shuffle: bool,

    /// How often the audio backend reports position
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
}

fn default_bucket_url() -> String {
    DEFAULT_BUCKET_URL.to_string()
}

fn default_max_keys() -> u32 {
    bucket_catalog::DEFAULT_MAX_KEYS
}

fn default_max_pages() -> Option<u32> {
    Some(1000)
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_status_interval_ms() -> u64 {
    250
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            bucket_url: default_bucket_url(),
            max_keys: default_max_keys(),
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            cache_unfiltered: false,
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            status_interval_ms: default_status_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `bucket-player.toml` in the
    /// working directory is used if present. Environment variables prefixed
    /// `BUCKET_PLAYER_` override file values, with `__` between section and
    /// key (e.g. `BUCKET_PLAYER_CATALOG__BUCKET_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("BUCKET_PLAYER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = &self.catalog.bucket_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "catalog.bucket_url must be an http(s) URL, got {:?}",
                url
            )));
        }

        if !(1..=1000).contains(&self.catalog.max_keys) {
            return Err(AppError::Config(
                "catalog.max_keys must be between 1 and 1000".to_string(),
            ));
        }

        if self.catalog.max_pages == Some(0) {
            return Err(AppError::Config(
                "catalog.max_pages must be at least 1".to_string(),
            ));
        }

        if self.playback.status_interval_ms == 0 {
            return Err(AppError::Config(
                "playback.status_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            bucket_url: self.catalog.bucket_url.clone(),
            max_keys: self.catalog.max_keys,
            max_pages: self.catalog.max_pages,
            request_timeout: Duration::from_secs(self.catalog.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.catalog.connect_timeout_secs),
        }
    }

    pub fn refetch_policy(&self) -> RefetchPolicy {
        if self.catalog.cache_unfiltered {
            RefetchPolicy::Cached
        } else {
            RefetchPolicy::Always
        }
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.playback.status_interval_ms)
    }
}
