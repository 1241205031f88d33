//! Unit tests for configuration loading and validation
//!
//! Tests that manipulate OTD_CONFIG are marked with #[serial] so they do
//! not race each other.

use otd_common::config::{
    resolve_config_path, BotConfig, PrivacyStatus, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FULL_CONFIG: &str = r#"
[channel]
handle = "@TheDailyWoo"

[storage]
catalog_path = "data/videos.json"

[date_parsing]
title_patterns = ["%B %d, %Y", "%m/%d/%Y"]
use_upload_date_fallback = false
timezone = "Europe/London"

[playlist]
title_format = "On This Day: {month} {day}"
description_format = "Recorded on {date} over the years"
privacy_status = "unlisted"

[reddit]
subreddit = "Adamthewoo"
post_title_format = "On This Day - {date}"
post_template = "{video_list}\n\n{playlist_url}"
flair_text = "Daily"

[features]
create_playlist = true
post_to_forum = false
dry_run = true

[logging]
level = "debug"
file = "bot.log"
"#;

#[test]
fn test_full_config_parses() {
    let config = BotConfig::from_toml_str(FULL_CONFIG).unwrap();

    assert_eq!(config.channel.handle, "@TheDailyWoo");
    assert_eq!(
        config.date_parsing.title_patterns,
        vec!["%B %d, %Y".to_string(), "%m/%d/%Y".to_string()]
    );
    assert!(!config.date_parsing.use_upload_date_fallback);
    assert_eq!(config.timezone(), Some("Europe/London"));
    assert_eq!(config.playlist.privacy_status, PrivacyStatus::Unlisted);
    assert_eq!(config.reddit.flair_text.as_deref(), Some("Daily"));
    assert!(!config.features.post_to_forum);
    assert!(config.features.dry_run);
    assert_eq!(config.logging.file, Some(PathBuf::from("bot.log")));
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = BotConfig::from_toml_str("[channel]\nhandle = \"@TheDailyWoo\"\n").unwrap();

    assert_eq!(config.storage.catalog_path, PathBuf::from("data/videos.json"));
    assert!(config.date_parsing.title_patterns.is_empty());
    assert!(config.date_parsing.use_upload_date_fallback);
    assert_eq!(config.timezone(), Some("America/New_York"));
    assert_eq!(config.playlist.title_format, "On This Day: {month} {day}");
    assert_eq!(config.reddit.subreddit, "Adamthewoo");
    assert!(config.features.create_playlist);
    assert!(config.features.post_to_forum);
    assert!(!config.features.dry_run);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unknown_key_rejected() {
    let text = "[channel]\nhandle = \"@x\"\n\n[features]\npost_to_reddit = true\n";
    let err = BotConfig::from_toml_str(text).unwrap_err();
    assert!(err.to_string().contains("post_to_reddit"), "{}", err);
}

#[test]
fn test_unknown_table_rejected() {
    let text = "[channel]\nhandle = \"@x\"\n\n[metrics]\nenabled = true\n";
    assert!(BotConfig::from_toml_str(text).is_err());
}

#[test]
fn test_wrong_type_rejected() {
    let text = "[channel]\nhandle = \"@x\"\n\n[features]\ndry_run = \"yes\"\n";
    assert!(BotConfig::from_toml_str(text).is_err());
}

#[test]
fn test_missing_channel_rejected() {
    assert!(BotConfig::from_toml_str("[features]\ndry_run = true\n").is_err());
}

#[test]
fn test_empty_handle_rejected() {
    assert!(BotConfig::from_toml_str("[channel]\nhandle = \"@\"\n").is_err());
}

#[test]
fn test_unknown_template_placeholder_rejected() {
    let text = "[channel]\nhandle = \"@x\"\n\n[playlist]\ntitle_format = \"{video_list}\"\n";
    let err = BotConfig::from_toml_str(text).unwrap_err();
    assert!(err.to_string().contains("video_list"), "{}", err);
}

#[test]
fn test_invalid_pattern_rejected() {
    let text = "[channel]\nhandle = \"@x\"\n\n[date_parsing]\ntitle_patterns = [\"%Q\"]\n";
    assert!(BotConfig::from_toml_str(text).is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let text = "[channel]\nhandle = \"@x\"\n\n[logging]\nlevel = \"loud\"\n";
    assert!(BotConfig::from_toml_str(text).is_err());
}

#[test]
fn test_invalid_privacy_rejected() {
    let text = "[channel]\nhandle = \"@x\"\n\n[playlist]\nprivacy_status = \"secret\"\n";
    assert!(BotConfig::from_toml_str(text).is_err());
}

#[test]
fn test_load_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = BotConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("not found"), "{}", err);
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = BotConfig::load(&path).unwrap();
    assert_eq!(config.reddit.post_title_format, "On This Day - {date}");
}

#[test]
fn test_shipped_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(DEFAULT_CONFIG_PATH);

    let config = BotConfig::load(&path).unwrap();
    assert_eq!(config.channel.handle, "@TheDailyWoo");
    assert_eq!(config.date_parsing.title_patterns[0], "%B %d, %Y");
    assert_eq!(config.reddit.flair_text.as_deref(), Some("On This Day"));
}

#[test]
#[serial]
fn test_resolve_prefers_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/otd-env.toml");
    let path = resolve_config_path(Some(Path::new("/tmp/otd-cli.toml")));
    assert_eq!(path, PathBuf::from("/tmp/otd-cli.toml"));
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_uses_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/otd-env.toml");
    assert_eq!(resolve_config_path(None), PathBuf::from("/tmp/otd-env.toml"));
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_falls_back_to_default() {
    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(resolve_config_path(None), PathBuf::from(DEFAULT_CONFIG_PATH));
}
