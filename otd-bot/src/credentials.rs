//! Secrets from the environment
//!
//! Credentials never live in the TOML file. Each workflow reads only the
//! variables it needs, so a dry run or a fetch works without forum secrets.

use otd_common::config::BotConfig;
use otd_common::{Error, Result};
use std::fmt;

pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const YOUTUBE_CHANNEL_HANDLE: &str = "YOUTUBE_CHANNEL_HANDLE";
pub const YOUTUBE_CLIENT_ID: &str = "YOUTUBE_CLIENT_ID";
pub const YOUTUBE_CLIENT_SECRET: &str = "YOUTUBE_CLIENT_SECRET";
pub const YOUTUBE_REFRESH_TOKEN: &str = "YOUTUBE_REFRESH_TOKEN";
pub const REDDIT_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const REDDIT_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const REDDIT_USERNAME: &str = "REDDIT_USERNAME";
pub const REDDIT_PASSWORD: &str = "REDDIT_PASSWORD";
pub const REDDIT_USER_AGENT: &str = "REDDIT_USER_AGENT";

/// User agent sent to the forum when `REDDIT_USER_AGENT` is unset
pub const DEFAULT_REDDIT_USER_AGENT: &str = "on-this-day-bot/1.0";

/// Non-empty value of an environment variable
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Value of an environment variable that must be set
pub fn required_var(name: &str) -> Result<String> {
    optional_var(name).ok_or_else(|| {
        Error::Config(format!("Required environment variable not set: {}", name))
    })
}

/// Channel handle, `YOUTUBE_CHANNEL_HANDLE` taking priority over the config
pub fn channel_handle(config: &BotConfig) -> String {
    optional_var(YOUTUBE_CHANNEL_HANDLE).unwrap_or_else(|| config.channel.handle.clone())
}

/// Refresh-token credentials for playlist management
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl OAuthCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required_var(YOUTUBE_CLIENT_ID)?,
            client_secret: required_var(YOUTUBE_CLIENT_SECRET)?,
            refresh_token: required_var(YOUTUBE_REFRESH_TOKEN)?,
        })
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Script-app credentials for forum posting
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

impl RedditCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required_var(REDDIT_CLIENT_ID)?,
            client_secret: required_var(REDDIT_CLIENT_SECRET)?,
            username: required_var(REDDIT_USERNAME)?,
            password: required_var(REDDIT_PASSWORD)?,
            user_agent: optional_var(REDDIT_USER_AGENT)
                .unwrap_or_else(|| DEFAULT_REDDIT_USER_AGENT.to_string()),
        })
    }
}

impl fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
