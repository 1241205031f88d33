//! Reddit API client
//!
//! Authenticates as a script app (password grant) and posts through
//! `oauth.reddit.com`.

use super::{error_for_status, FlairTemplate, ForumService, ServiceError, SubmittedPost};
use crate::credentials::RedditCredentials;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";

/// Reddit API client holding a bearer token
pub struct RedditClient {
    http_client: reqwest::Client,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    name: String,
}

/// `api_type=json` envelope
#[derive(Debug, Deserialize)]
struct JsonEnvelope<T> {
    json: JsonBody<T>,
}

#[derive(Debug, Deserialize)]
struct JsonBody<T> {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct FlairResource {
    id: String,
    #[serde(default)]
    text: String,
}

/// Turn a non-empty `json.errors` list into an API error
fn check_errors<T>(body: JsonBody<T>) -> Result<Option<T>, ServiceError> {
    if body.errors.is_empty() {
        Ok(body.data)
    } else {
        let messages: Vec<String> = body.errors.iter().map(|e| e.to_string()).collect();
        Err(ServiceError::Api(200, messages.join("; ")))
    }
}

impl RedditClient {
    /// Log in with script-app credentials
    pub async fn login(credentials: &RedditCredentials) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let params = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = http_client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        // Bad credentials come back as 200 with an error field
        match (token.access_token, token.error) {
            (Some(access_token), None) => Ok(Self {
                http_client,
                access_token,
            }),
            (_, Some(error)) => Err(ServiceError::Auth(error)),
            (None, None) => Err(ServiceError::Auth("no access token returned".to_string())),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = builder
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }

    fn url(path: &str) -> String {
        format!("{}{}", OAUTH_BASE_URL, path)
    }
}

#[async_trait]
impl ForumService for RedditClient {
    async fn username(&self) -> Result<String, ServiceError> {
        let me: MeResponse = self
            .send(self.http_client.get(Self::url("/api/v1/me")))
            .await?;
        Ok(me.name)
    }

    async fn submit_text_post(
        &self,
        subreddit: &str,
        title: &str,
        body: &str,
    ) -> Result<SubmittedPost, ServiceError> {
        tracing::debug!(subreddit = %subreddit, "Submitting self post");

        let params = [
            ("api_type", "json"),
            ("kind", "self"),
            ("sr", subreddit),
            ("title", title),
            ("text", body),
        ];

        let envelope: JsonEnvelope<SubmitData> = self
            .send(self.http_client.post(Self::url("/api/submit")).form(&params))
            .await?;

        let data = check_errors(envelope.json)?
            .ok_or_else(|| ServiceError::Parse("submit response carried no data".to_string()))?;

        Ok(SubmittedPost {
            id: data.name,
            url: data.url,
        })
    }

    async fn link_flairs(&self, subreddit: &str) -> Result<Vec<FlairTemplate>, ServiceError> {
        let path = format!("/r/{}/api/link_flair_v2", subreddit);
        let flairs: Vec<FlairResource> = self.send(self.http_client.get(Self::url(&path))).await?;

        Ok(flairs
            .into_iter()
            .map(|f| FlairTemplate {
                id: f.id,
                text: f.text,
            })
            .collect())
    }

    async fn select_flair(
        &self,
        subreddit: &str,
        post_id: &str,
        template_id: &str,
    ) -> Result<(), ServiceError> {
        let path = format!("/r/{}/api/selectflair", subreddit);
        let params = [
            ("api_type", "json"),
            ("link", post_id),
            ("flair_template_id", template_id),
        ];

        let envelope: JsonEnvelope<serde_json::Value> = self
            .send(self.http_client.post(Self::url(&path)).form(&params))
            .await?;
        check_errors(envelope.json)?;
        Ok(())
    }
}
