//! External service adapters
//!
//! Workflows talk to the video platform and the forum through the traits in
//! this module. Each run constructs the concrete clients once and passes them
//! in, so tests substitute in-memory implementations.

pub mod rate_limiter;
pub mod reddit_client;
pub mod youtube_client;

pub use rate_limiter::RateLimiter;
pub use reddit_client::RedditClient;
pub use youtube_client::YouTubeClient;

use async_trait::async_trait;
use otd_common::config::PrivacyStatus;
use thiserror::Error;

/// Remote service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Channel resolved from a handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDetails {
    pub channel_id: String,
    pub title: String,
    pub uploads_playlist_id: String,
}

/// One entry of a channel's uploads playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// RFC 3339 publish instant as reported by the platform
    pub published_at: String,
    pub thumbnail_url: String,
}

/// One page of uploads
#[derive(Debug, Clone, Default)]
pub struct UploadPage {
    pub items: Vec<UploadItem>,
    pub next_page_token: Option<String>,
}

/// Read access to a channel's catalog
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Channel id for a handle such as `@TheDailyWoo`
    async fn find_channel_id(&self, handle: &str) -> Result<String, ServiceError>;

    /// Title and uploads playlist of a channel
    async fn channel_details(&self, channel_id: &str) -> Result<ChannelDetails, ServiceError>;

    /// One page of the uploads playlist
    async fn upload_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<UploadPage, ServiceError>;
}

/// Playlist owned by the authenticated account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub title: String,
}

/// Playlist mutation on the authenticated account
#[async_trait]
pub trait PlaylistService: Send + Sync {
    async fn my_playlists(&self) -> Result<Vec<PlaylistSummary>, ServiceError>;

    /// Create a playlist and return its id
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: PrivacyStatus,
    ) -> Result<String, ServiceError>;

    /// Ids of the playlist's items (not the video ids)
    async fn playlist_item_ids(&self, playlist_id: &str) -> Result<Vec<String>, ServiceError>;

    async fn delete_playlist_item(&self, item_id: &str) -> Result<(), ServiceError>;

    async fn add_video(&self, playlist_id: &str, video_id: &str) -> Result<(), ServiceError>;
}

/// Post created on the forum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedPost {
    /// Full name used by follow-up calls (e.g. `t3_abc123`)
    pub id: String,
    pub url: String,
}

/// Link flair offered by a subreddit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlairTemplate {
    pub id: String,
    pub text: String,
}

/// Forum posting on the authenticated account
#[async_trait]
pub trait ForumService: Send + Sync {
    /// Name of the authenticated account
    async fn username(&self) -> Result<String, ServiceError>;

    async fn submit_text_post(
        &self,
        subreddit: &str,
        title: &str,
        body: &str,
    ) -> Result<SubmittedPost, ServiceError>;

    async fn link_flairs(&self, subreddit: &str) -> Result<Vec<FlairTemplate>, ServiceError>;

    async fn select_flair(
        &self,
        subreddit: &str,
        post_id: &str,
        template_id: &str,
    ) -> Result<(), ServiceError>;
}

/// Map a non-success HTTP status to a service error
pub(crate) async fn error_for_status(response: reqwest::Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 | 403 => ServiceError::Auth(format!("{} {}", status, body)),
        404 => ServiceError::NotFound(body),
        code => ServiceError::Api(code, body),
    }
}
