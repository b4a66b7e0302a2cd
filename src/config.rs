//! Configuration file parser for `herald.toml`.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
//!
//! [`ConfigError`] is also the error of the source registry loader
//! (`feed::load_sources`): both are fatal and abort the run before any fetch.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config or source list exceeds maximum allowed size.
    #[error("File too large: {0}")]
    TooLarge(String),

    /// The source list file does not exist.
    #[error("Source list not found: {}", .0.display())]
    SourcesMissing(PathBuf),

    /// The source list exists but could not be read.
    #[error("Failed to read source list {}: {source}", path.display())]
    SourcesRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source list is not valid JSON or lacks required fields.
    #[error("Invalid source list {}: {source}", path.display())]
    SourcesMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page heading and document title.
    pub title: String,

    /// Content of the page's `<meta name="description">`.
    pub description: String,

    /// Path of the JSON source list.
    pub feeds: PathBuf,

    /// Path the rendered page is written to.
    pub output: PathBuf,

    /// Per-source fetch timeout in seconds.
    pub fetch_timeout_secs: u64,

    /// Entry cap for sources that do not set `maxItems`.
    pub default_max_items: usize,

    /// Number of sources fetched at the same time.
    pub max_concurrent_fetches: usize,

    /// User-Agent header sent with feed requests.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "My News".to_string(),
            description: "A fast, free, static news aggregator.".to_string(),
            feeds: PathBuf::from("feeds.json"),
            output: PathBuf::from("dist/index.html"),
            fetch_timeout_secs: 15,
            default_max_items: 10,
            max_concurrent_fetches: 8,
            user_agent: concat!("herald/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    pub(crate) const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a runaway file
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "title",
                "description",
                "feeds",
                "output",
                "fetch_timeout_secs",
                "default_max_items",
                "max_concurrent_fetches",
                "user_agent",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), title = %config.title, "Loaded configuration");
        Ok(config)
    }

    /// Per-source fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
