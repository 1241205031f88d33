//! Daily bot workflows
//!
//! - **fetch**: rebuild the catalog from the channel's uploads
//! - **playlist**: refresh today's playlist from the catalog
//! - **post**: publish today's list to the forum
//!
//! Playlist and post runs are split into a pure planning step, which decides
//! whether anything should be published, and an apply step that talks to the
//! remote service. Clients are only built once a plan is ready, so dry runs
//! need no credentials.

pub mod fetch;
pub mod playlist;
pub mod post;

pub use fetch::{run_fetch, FetchSummary};
pub use playlist::{apply_playlist, plan_playlist, PlaylistJob, PlaylistOutcome, PlaylistPlan};
pub use post::{plan_post, publish_post, PostDraft, PostOutcome, PostPlan};

use crate::BotResult;
use otd_common::catalog::CatalogStore;
use otd_common::{matcher, Catalog, TodayKey};

/// Load the catalog, or `None` when nothing has been fetched yet
pub fn load_catalog(store: &CatalogStore) -> BotResult<Option<Catalog>> {
    let catalog = store.load()?;
    if catalog.is_empty() {
        tracing::error!(
            path = %store.path().display(),
            "No videos in catalog. Run fetch first!"
        );
        return Ok(None);
    }
    tracing::info!(videos = catalog.videos.len(), "Loaded catalog");
    Ok(Some(catalog))
}

/// Values for `{month}`, `{day}` and `{date}`
pub fn date_values(today: &TodayKey) -> [(&'static str, &str); 3] {
    [
        ("month", today.month_name()),
        ("day", today.day_padded()),
        ("date", today.formatted.as_str()),
    ]
}

/// Playlist link for the daily post
///
/// A failed playlist step is logged and yields no link, so the post still
/// goes out with the placeholder text.
pub fn daily_playlist_url<E: std::fmt::Display>(
    playlist_result: Result<PlaylistOutcome, E>,
) -> Option<String> {
    match playlist_result {
        Ok(outcome) => outcome.url().map(str::to_string),
        Err(e) => {
            tracing::error!("Playlist update failed, posting without it: {:#}", e);
            None
        }
    }
}

/// Today's matches formatted as the forum list, without touching the network
pub fn preview(catalog: &Catalog, today: &TodayKey) -> String {
    let videos = matcher::videos_for_date(catalog, today.month, today.day);
    tracing::info!(date = %today.formatted, matches = videos.len(), "Preview");
    matcher::format_video_list(&videos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_date_values() {
        let today = TodayKey::from_month_day(3, 5).unwrap();
        let values = date_values(&today);
        assert_eq!(values[0], ("month", "March"));
        assert_eq!(values[1], ("day", "05"));
        assert_eq!(values[2], ("date", "March 05"));
    }

    #[test]
    fn test_daily_playlist_url_from_updated_playlist() {
        let outcome = PlaylistOutcome::Updated {
            playlist_id: "PL1".to_string(),
            url: "https://www.youtube.com/playlist?list=PL1".to_string(),
            added: 2,
            total: 2,
        };
        assert_eq!(
            daily_playlist_url::<String>(Ok(outcome)).as_deref(),
            Some("https://www.youtube.com/playlist?list=PL1")
        );
        assert_eq!(daily_playlist_url::<String>(Ok(PlaylistOutcome::Disabled)), None);
    }

    #[test]
    fn test_daily_playlist_failure_still_posts() {
        let failed: Result<PlaylistOutcome, String> =
            Err("YouTube authentication failed".to_string());
        assert_eq!(daily_playlist_url(failed), None);
    }

    #[test]
    fn test_load_catalog_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("videos.json"));
        assert!(load_catalog(&store).unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_preview_empty_catalog() {
        let today = TodayKey::from_month_day(1, 1).unwrap();
        assert_eq!(preview(&Catalog::empty(), &today), matcher::NO_VIDEOS_PLACEHOLDER);
    }
}
