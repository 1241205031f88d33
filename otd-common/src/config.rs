//! Configuration loading and validation
//!
//! The bot reads one TOML file. Every table rejects unknown keys, and
//! templates and date patterns are checked when the file is loaded, so a
//! typo fails the run up front instead of silently falling back to a
//! default. Absent keys take the defaults documented on each field.

use crate::templates::{self, PLAYLIST_PLACEHOLDERS, POST_PLACEHOLDERS};
use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "OTD_CONFIG";

/// Configuration file used when neither the CLI nor the environment name one
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuration file resolution, highest priority first:
/// 1. Command-line argument
/// 2. `OTD_CONFIG` environment variable
/// 3. `config/config.toml` relative to the working directory
pub fn resolve_config_path(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Complete bot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    pub channel: ChannelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub date_parsing: DateParsingConfig,
    #[serde(default)]
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Channel handle, with or without the leading `@`
    pub handle: String,
}

/// Catalog location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Default: `data/videos.json`
    pub catalog_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(crate::catalog::store::DEFAULT_CATALOG_PATH),
        }
    }
}

/// Recording date extraction and "today" resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateParsingConfig {
    /// strftime patterns tried in order against the whole title
    pub title_patterns: Vec<String>,
    /// Use the upload date when no date is found in the title (default: true)
    pub use_upload_date_fallback: bool,
    /// IANA timezone for "today" (default: `America/New_York`)
    pub timezone: Option<String>,
}

impl Default for DateParsingConfig {
    fn default() -> Self {
        Self {
            title_patterns: Vec::new(),
            use_upload_date_fallback: true,
            timezone: Some("America/New_York".to_string()),
        }
    }
}

/// Playlist visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl PrivacyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyStatus::Public => "public",
            PrivacyStatus::Unlisted => "unlisted",
            PrivacyStatus::Private => "private",
        }
    }
}

/// Daily playlist text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaylistConfig {
    /// Placeholders: `{month}`, `{day}`, `{date}`
    pub title_format: String,
    /// Placeholders: `{month}`, `{day}`, `{date}`
    pub description_format: String,
    pub privacy_status: PrivacyStatus,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            title_format: "On This Day: {month} {day}".to_string(),
            description_format: String::new(),
            privacy_status: PrivacyStatus::Public,
        }
    }
}

/// Daily forum post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedditConfig {
    /// Subreddit name without the `r/` prefix
    pub subreddit: String,
    /// Placeholders: `{month}`, `{day}`, `{date}`, `{video_list}`, `{playlist_url}`
    pub post_title_format: String,
    /// Placeholders: `{month}`, `{day}`, `{date}`, `{video_list}`, `{playlist_url}`
    pub post_template: String,
    /// Link flair applied after submission, when the subreddit offers it
    pub flair_text: Option<String>,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            subreddit: "Adamthewoo".to_string(),
            post_title_format: "On This Day - {month} {day}".to_string(),
            post_template: "{video_list}\n\nPlaylist: {playlist_url}".to_string(),
            flair_text: None,
        }
    }
}

/// Feature toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureFlags {
    pub create_playlist: bool,
    pub post_to_forum: bool,
    /// Log what would be published without calling any write API
    pub dry_run: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            create_playlist: true,
            post_to_forum: true,
            dry_run: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level filter; `RUST_LOG` overrides it
    pub level: String,
    /// Optional log file (appended to)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl BotConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Config(format!("Read {} failed: {}", path.display(), e))
            }
        })?;

        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{} ({})", e, path.display())))
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BotConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialize but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.channel.handle.trim().trim_start_matches('@').is_empty() {
            return Err(Error::Config("channel.handle must not be empty".to_string()));
        }

        for pattern in &self.date_parsing.title_patterns {
            if pattern.trim().is_empty()
                || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
            {
                return Err(Error::Config(format!(
                    "Invalid title pattern {:?} in date_parsing.title_patterns",
                    pattern
                )));
            }
        }

        templates::validate(&self.playlist.title_format, PLAYLIST_PLACEHOLDERS)?;
        templates::validate(&self.playlist.description_format, PLAYLIST_PLACEHOLDERS)?;
        templates::validate(&self.reddit.post_title_format, POST_PLACEHOLDERS)?;
        templates::validate(&self.reddit.post_template, POST_PLACEHOLDERS)?;

        if self.reddit.subreddit.trim().is_empty() {
            return Err(Error::Config("reddit.subreddit must not be empty".to_string()));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::Config(format!(
                "Invalid logging.level {:?} (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Timezone for "today", if configured
    pub fn timezone(&self) -> Option<&str> {
        self.date_parsing.timezone.as_deref()
    }
}
