//! Per-feed configuration files: `<feed>.json` in the config directory.
//!
//! A config names the feed source, which decoder shape to use, and the
//! ordered list of output files with their matching rules. Missing keys
//! take defaults so a config can be as small as a link and one file;
//! unknown keys are silently ignored by serde.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Which decoder shape the feed uses.
///
/// Anything other than the two known values deserializes to `Unknown`,
/// which decodes to an empty item sequence with a warning — a bad value
/// degrades the run instead of failing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    #[default]
    Standard,
    Alternate,
    #[serde(other)]
    Unknown,
}

/// One feed's configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Feed source: an http(s) URL or a local path.
    pub link: String,

    /// Selects the decoder path. Defaults to the standard (RSS-like) shape.
    pub feed_type: FeedType,

    /// Expectation flags: when set, the verification layer warns if no
    /// decoded item resolved the field. Never consulted by matching.
    pub should_find_author: bool,
    pub should_find_content: bool,
    #[serde(rename = "shouldFindID")]
    pub should_find_id: bool,

    /// Output files in priority order — earlier files claim items first.
    pub files: Vec<FileRules>,
}

/// Matching rules for one output file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileRules {
    pub filename: String,

    /// Take every item that no earlier file claimed.
    pub include_all: bool,

    /// Substring lists per category, tested in this order.
    pub titles: Vec<String>,
    pub content: Vec<String>,
    pub authors: Vec<String>,
    pub links: Vec<String>,
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a JSON file.
    ///
    /// Unlike an app-settings file, a feed config is required: a missing
    /// file is `Err(ConfigError::Io)` — a run without its rule file has
    /// nothing to do.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a corrupted
        // or runaway file into memory
        let meta = std::fs::metadata(path)?;
        if meta.len() > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "Config file is {} bytes (max {} bytes)",
                meta.len(),
                Self::MAX_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            feed_type = ?config.feed_type,
            files = config.files.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}
