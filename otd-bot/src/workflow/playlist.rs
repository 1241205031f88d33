//! Daily playlist refresh

use super::{date_values, load_catalog};
use crate::error::{BotError, BotResult};
use crate::services::youtube_client::playlist_url;
use crate::services::PlaylistService;
use otd_common::catalog::CatalogStore;
use otd_common::config::{BotConfig, PrivacyStatus};
use otd_common::matcher::{self, year_label};
use otd_common::{templates, TodayKey};
use tracing::{info, warn};

/// Work to do against the playlist service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistJob {
    pub title: String,
    pub description: String,
    pub privacy: PrivacyStatus,
    /// Videos to insert, oldest recording first
    pub video_ids: Vec<String>,
}

/// Result of a playlist run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistOutcome {
    /// Catalog missing or empty
    NoCatalog,
    /// Nothing was recorded on this day
    NoMatches,
    /// Dry run: the playlist that would have been built
    DryRun(PlaylistJob),
    /// `create_playlist` is off
    Disabled,
    Updated {
        playlist_id: String,
        url: String,
        /// Inserts that succeeded
        added: usize,
        total: usize,
    },
}

impl PlaylistOutcome {
    /// Playlist URL, when a playlist was updated
    pub fn url(&self) -> Option<&str> {
        match self {
            PlaylistOutcome::Updated { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Planning result: either a final outcome or a job to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistPlan {
    Done(PlaylistOutcome),
    Ready(PlaylistJob),
}

/// Decide what today's playlist should contain
pub fn plan_playlist(
    config: &BotConfig,
    store: &CatalogStore,
    today: &TodayKey,
) -> BotResult<PlaylistPlan> {
    let Some(catalog) = load_catalog(store)? else {
        return Ok(PlaylistPlan::Done(PlaylistOutcome::NoCatalog));
    };

    info!("Today's date: {}", today.formatted);
    let videos = matcher::videos_for_date(&catalog, today.month, today.day);
    info!("Found {} videos for this date", videos.len());

    if videos.is_empty() {
        info!("No videos found for today. Exiting.");
        return Ok(PlaylistPlan::Done(PlaylistOutcome::NoMatches));
    }

    for video in &videos {
        info!("  - {}: {}", year_label(video), video.title);
    }

    let values = date_values(today);
    let job = PlaylistJob {
        title: templates::render(&config.playlist.title_format, &values)?,
        description: templates::render(&config.playlist.description_format, &values)?,
        privacy: config.playlist.privacy_status,
        video_ids: videos.iter().map(|v| v.video_id.clone()).collect(),
    };

    if config.features.dry_run {
        info!(title = %job.title, "Dry run mode - playlist not created");
        return Ok(PlaylistPlan::Done(PlaylistOutcome::DryRun(job)));
    }

    if !config.features.create_playlist {
        info!("Playlist creation disabled in config");
        return Ok(PlaylistPlan::Done(PlaylistOutcome::Disabled));
    }

    Ok(PlaylistPlan::Ready(job))
}

/// Find or create the playlist, then replace its contents
///
/// Failing to list or create the playlist aborts. Individual deletes and
/// inserts that fail are logged and skipped.
pub async fn apply_playlist(
    service: &dyn PlaylistService,
    job: &PlaylistJob,
) -> BotResult<PlaylistOutcome> {
    let existing = service
        .my_playlists()
        .await
        .map_err(BotError::service("List playlists"))?
        .into_iter()
        .find(|p| p.title == job.title);

    let playlist_id = match existing {
        Some(playlist) => {
            info!("Found existing playlist: {}", playlist.title);
            playlist.id
        }
        None => {
            let id = service
                .create_playlist(&job.title, &job.description, job.privacy)
                .await
                .map_err(BotError::service(format!("Create playlist {:?}", job.title)))?;
            info!("Created new playlist: {}", job.title);
            id
        }
    };

    clear_playlist(service, &playlist_id).await?;

    let mut added = 0;
    for video_id in &job.video_ids {
        match service.add_video(&playlist_id, video_id).await {
            Ok(()) => added += 1,
            Err(e) => warn!("Error adding video {}: {}", video_id, e),
        }
    }

    let total = job.video_ids.len();
    let url = playlist_url(&playlist_id);
    info!("Added {}/{} videos to playlist", added, total);
    info!("Playlist URL: {}", url);

    Ok(PlaylistOutcome::Updated {
        playlist_id,
        url,
        added,
        total,
    })
}

async fn clear_playlist(service: &dyn PlaylistService, playlist_id: &str) -> BotResult<()> {
    let items = service
        .playlist_item_ids(playlist_id)
        .await
        .map_err(BotError::service("List playlist items"))?;

    let mut removed = 0;
    for item_id in &items {
        match service.delete_playlist_item(item_id).await {
            Ok(()) => removed += 1,
            Err(e) => warn!("Error removing playlist item {}: {}", item_id, e),
        }
    }

    if !items.is_empty() {
        info!("Cleared {}/{} existing items", removed, items.len());
    }
    Ok(())
}
