//! Daily forum post

use super::{date_values, load_catalog};
use crate::error::{BotError, BotResult};
use crate::services::ForumService;
use otd_common::catalog::CatalogStore;
use otd_common::config::BotConfig;
use otd_common::{matcher, templates, TodayKey};
use tracing::{info, warn};

/// Stand-in for `{playlist_url}` when no playlist was produced
pub const PLAYLIST_URL_PLACEHOLDER: &str = "Coming soon!";

/// Rendered post, ready to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub subreddit: String,
    pub title: String,
    pub body: String,
    pub flair_text: Option<String>,
}

/// Result of a post run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// `post_to_forum` is off
    Disabled,
    NoCatalog,
    NoMatches,
    /// Dry run: the post that would have been submitted
    DryRun(PostDraft),
    Posted {
        url: String,
        flair_applied: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostPlan {
    Done(PostOutcome),
    Ready(PostDraft),
}

/// Render today's post, or decide that there is nothing to post
pub fn plan_post(
    config: &BotConfig,
    store: &CatalogStore,
    today: &TodayKey,
    playlist_url: Option<&str>,
) -> BotResult<PostPlan> {
    if !config.features.post_to_forum {
        info!("Forum posting disabled in config");
        return Ok(PostPlan::Done(PostOutcome::Disabled));
    }

    let Some(catalog) = load_catalog(store)? else {
        return Ok(PostPlan::Done(PostOutcome::NoCatalog));
    };

    info!("Today's date: {}", today.formatted);
    let videos = matcher::videos_for_date(&catalog, today.month, today.day);
    info!("Found {} videos for this date", videos.len());

    if videos.is_empty() {
        info!("No videos found for today. No post will be made.");
        return Ok(PostPlan::Done(PostOutcome::NoMatches));
    }

    let video_list = matcher::format_video_list(&videos);
    let playlist_url = playlist_url.unwrap_or(PLAYLIST_URL_PLACEHOLDER);

    let [month, day, date] = date_values(today);
    let values = [
        month,
        day,
        date,
        ("video_list", video_list.as_str()),
        ("playlist_url", playlist_url),
    ];

    let draft = PostDraft {
        subreddit: config.reddit.subreddit.clone(),
        title: templates::render(&config.reddit.post_title_format, &values)?,
        body: templates::render(&config.reddit.post_template, &values)?,
        flair_text: config.reddit.flair_text.clone(),
    };

    info!("Post preview:");
    info!("Title: {}", draft.title);
    for line in draft.body.lines() {
        info!("{}", line);
    }

    if config.features.dry_run {
        info!("Dry run mode - post not submitted");
        return Ok(PostPlan::Done(PostOutcome::DryRun(draft)));
    }

    Ok(PostPlan::Ready(draft))
}

/// Submit the post and apply the configured flair
///
/// Flair is best effort: a missing template or a failed selection only
/// produces a warning.
pub async fn publish_post(forum: &dyn ForumService, draft: &PostDraft) -> BotResult<PostOutcome> {
    let username = forum
        .username()
        .await
        .map_err(BotError::service("Read forum account"))?;
    info!("Authenticated as: u/{}", username);

    info!("Posting to r/{}...", draft.subreddit);
    let post = forum
        .submit_text_post(&draft.subreddit, &draft.title, &draft.body)
        .await
        .map_err(BotError::service(format!("Submit post to r/{}", draft.subreddit)))?;
    info!("Post created: {}", post.url);

    let flair_applied = match &draft.flair_text {
        Some(flair_text) => apply_flair(forum, &draft.subreddit, &post.id, flair_text).await,
        None => false,
    };

    Ok(PostOutcome::Posted {
        url: post.url,
        flair_applied,
    })
}

async fn apply_flair(
    forum: &dyn ForumService,
    subreddit: &str,
    post_id: &str,
    flair_text: &str,
) -> bool {
    let flairs = match forum.link_flairs(subreddit).await {
        Ok(flairs) => flairs,
        Err(e) => {
            warn!("Could not apply flair: {}", e);
            return false;
        }
    };

    let Some(template) = flairs.iter().find(|f| f.text == flair_text) else {
        warn!(flair = %flair_text, "No matching flair template");
        return false;
    };

    match forum.select_flair(subreddit, post_id, &template.id).await {
        Ok(()) => {
            info!("Applied flair: {}", flair_text);
            true
        }
        Err(e) => {
            warn!("Could not apply flair: {}", e);
            false
        }
    }
}
