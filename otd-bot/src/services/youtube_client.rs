//! YouTube Data API v3 client
//!
//! Catalog reads authenticate with an API key. Playlist changes need an
//! OAuth access token, obtained here from a long-lived refresh token.

use super::{
    error_for_status, ChannelDetails, PlaylistService, PlaylistSummary, RateLimiter,
    ServiceError, UploadItem, UploadPage, VideoSource,
};
use crate::credentials::OAuthCredentials;
use async_trait::async_trait;
use otd_common::config::PrivacyStatus;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USER_AGENT: &str = concat!("on-this-day-bot/", env!("CARGO_PKG_VERSION"));
/// Politeness delay between uploads pages
const PAGE_INTERVAL_MS: u64 = 500;
/// Largest page size the API allows
const MAX_RESULTS: &str = "50";

enum Auth {
    ApiKey(String),
    Bearer(String),
}

/// YouTube API client
pub struct YouTubeClient {
    http_client: reqwest::Client,
    auth: Auth,
    page_limiter: RateLimiter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: String,
    #[serde(default)]
    custom_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    snippet: ChannelSnippet,
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    id: String,
    snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: String,
    #[serde(default)]
    description: String,
    published_at: String,
    resource_id: ResourceId,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    id: String,
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

fn build_http_client() -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| ServiceError::Network(e.to_string()))
}

impl YouTubeClient {
    /// Read-only client authenticated with an API key
    pub fn with_api_key(api_key: String) -> Result<Self, ServiceError> {
        Ok(Self {
            http_client: build_http_client()?,
            auth: Auth::ApiKey(api_key),
            page_limiter: RateLimiter::new(PAGE_INTERVAL_MS),
        })
    }

    /// Client acting on the account that issued `credentials`
    ///
    /// Exchanges the refresh token for an access token up front.
    pub async fn with_oauth(credentials: &OAuthCredentials) -> Result<Self, ServiceError> {
        let http_client = build_http_client()?;

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = http_client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Auth(format!(
                "token refresh rejected ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        tracing::debug!("Obtained YouTube access token");

        Ok(Self {
            http_client,
            auth: Auth::Bearer(token.access_token),
            page_limiter: RateLimiter::new(PAGE_INTERVAL_MS),
        })
    }

    fn request(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", YOUTUBE_BASE_URL, endpoint);
        let builder = self.http_client.request(method, url);
        match &self.auth {
            Auth::ApiKey(key) => builder.query(&[("key", key.as_str())]),
            Auth::Bearer(token) => builder.bearer_auth(token),
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ServiceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_for_status(response).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        tracing::debug!(endpoint = %endpoint, "Querying YouTube API");

        let response = self
            .send(self.request(reqwest::Method::GET, endpoint).query(query))
            .await?;

        response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn find_channel_id(&self, handle: &str) -> Result<String, ServiceError> {
        let handle = handle.trim_start_matches('@');

        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", handle),
                    ("type", "channel"),
                    ("maxResults", "5"),
                ],
            )
            .await?;

        let wanted = format!("@{}", handle.to_lowercase());
        let exact = response.items.iter().find(|item| {
            item.snippet
                .custom_url
                .as_deref()
                .is_some_and(|url| url.to_lowercase() == wanted)
        });

        exact
            .or_else(|| response.items.first())
            .map(|item| item.snippet.channel_id.clone())
            .ok_or_else(|| ServiceError::NotFound(format!("Channel not found: {}", handle)))
    }

    async fn channel_details(&self, channel_id: &str) -> Result<ChannelDetails, ServiceError> {
        let response: ListResponse<ChannelItem> = self
            .get_json(
                "channels",
                &[("part", "contentDetails,snippet"), ("id", channel_id)],
            )
            .await?;

        let channel = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(format!("Channel not found: {}", channel_id)))?;

        Ok(ChannelDetails {
            channel_id: channel_id.to_string(),
            title: channel.snippet.title,
            uploads_playlist_id: channel.content_details.related_playlists.uploads,
        })
    }

    async fn upload_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<UploadPage, ServiceError> {
        self.page_limiter.wait().await;

        let mut query = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", MAX_RESULTS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItemResource> =
            self.get_json("playlistItems", &query).await?;

        let items = response
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet?;
                let video_id = snippet.resource_id.video_id?;
                Some(UploadItem {
                    video_id,
                    title: snippet.title,
                    description: snippet.description,
                    published_at: snippet.published_at,
                    thumbnail_url: snippet.thumbnails.high.map(|t| t.url).unwrap_or_default(),
                })
            })
            .collect();

        Ok(UploadPage {
            items,
            next_page_token: response.next_page_token,
        })
    }
}

#[async_trait]
impl PlaylistService for YouTubeClient {
    async fn my_playlists(&self) -> Result<Vec<PlaylistSummary>, ServiceError> {
        let mut playlists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("part", "snippet"), ("mine", "true"), ("maxResults", MAX_RESULTS)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response: ListResponse<PlaylistResource> = self.get_json("playlists", &query).await?;
            playlists.extend(response.items.into_iter().map(|p| PlaylistSummary {
                id: p.id,
                title: p.snippet.title,
            }));

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(playlists)
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: PrivacyStatus,
    ) -> Result<String, ServiceError> {
        let body = json!({
            "snippet": { "title": title, "description": description },
            "status": { "privacyStatus": privacy.as_str() },
        });

        let response = self
            .send(
                self.request(reqwest::Method::POST, "playlists")
                    .query(&[("part", "snippet,status")])
                    .json(&body),
            )
            .await?;

        let created: CreatedResource = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(created.id)
    }

    async fn playlist_item_ids(&self, playlist_id: &str) -> Result<Vec<String>, ServiceError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("part", "id"),
                ("playlistId", playlist_id),
                ("maxResults", MAX_RESULTS),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response: ListResponse<PlaylistItemResource> =
                self.get_json("playlistItems", &query).await?;
            ids.extend(response.items.into_iter().map(|item| item.id));

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(ids)
    }

    async fn delete_playlist_item(&self, item_id: &str) -> Result<(), ServiceError> {
        self.send(
            self.request(reqwest::Method::DELETE, "playlistItems")
                .query(&[("id", item_id)]),
        )
        .await?;
        Ok(())
    }

    async fn add_video(&self, playlist_id: &str, video_id: &str) -> Result<(), ServiceError> {
        let body = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": { "kind": "youtube#video", "videoId": video_id },
            }
        });

        self.send(
            self.request(reqwest::Method::POST, "playlistItems")
                .query(&[("part", "snippet")])
                .json(&body),
        )
        .await?;
        Ok(())
    }
}

/// Public URL of a playlist
pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}
