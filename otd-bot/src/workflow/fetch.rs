//! Catalog rebuild from the channel's uploads playlist

use chrono::NaiveDate;
use crate::error::{BotError, BotResult};
use crate::services::{UploadItem, VideoSource};
use otd_common::catalog::{CatalogStore, DateStats};
use otd_common::config::DateParsingConfig;
use otd_common::date_parser::TitleDateParser;
use otd_common::{Catalog, ChannelInfo, VideoRecord};
use tracing::{info, warn};

/// Entries the platform reports in place of hidden videos
const HIDDEN_TITLES: &[&str] = &["Private video", "Deleted video"];

/// Result of a fetch run
#[derive(Debug, Clone)]
pub struct FetchSummary {
    pub channel_name: String,
    pub pages: usize,
    /// True when paging stopped early on an error
    pub partial: bool,
    pub stats: DateStats,
}

/// Fetch every upload of `handle`, rebuild the catalog and save it
///
/// The previous catalog file is backed up before being replaced. A failing
/// page ends paging and the videos gathered so far are kept, unless nothing
/// was gathered at all.
pub async fn run_fetch(
    source: &dyn VideoSource,
    handle: &str,
    date_parsing: &DateParsingConfig,
    store: &CatalogStore,
) -> BotResult<FetchSummary> {
    let handle = handle.trim().trim_start_matches('@');
    info!(handle = %handle, "Fetching channel");

    let channel_id = source
        .find_channel_id(handle)
        .await
        .map_err(BotError::service(format!("Look up channel @{}", handle)))?;
    let details = source
        .channel_details(&channel_id)
        .await
        .map_err(BotError::service(format!("Read channel {}", channel_id)))?;
    info!(channel = %details.title, channel_id = %channel_id, "Found channel");

    let parser = TitleDateParser::new(date_parsing.title_patterns.clone());

    let mut videos: Vec<VideoRecord> = Vec::new();
    let mut pages = 0;
    let mut partial = false;
    let mut page_token: Option<String> = None;

    loop {
        let page = match source
            .upload_page(&details.uploads_playlist_id, page_token.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) if !videos.is_empty() => {
                warn!("Error fetching uploads page {}: {}", pages + 1, e);
                partial = true;
                break;
            }
            Err(e) => return Err(BotError::service("Fetch uploads")(e)),
        };
        pages += 1;

        videos.extend(
            page.items
                .into_iter()
                .filter_map(|item| to_record(item, &parser, date_parsing.use_upload_date_fallback)),
        );
        info!("Fetched {} videos so far...", videos.len());

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    let channel_info = ChannelInfo {
        channel_id: details.channel_id,
        channel_name: details.title,
        channel_handle: format!("@{}", handle),
        uploads_playlist_id: Some(details.uploads_playlist_id),
        total_videos: 0,
        last_updated: None,
    };
    let mut catalog = Catalog::from_fetch(channel_info, videos);

    store.backup()?;
    store.save(&mut catalog)?;

    let stats = catalog.date_stats();
    info!("Total videos: {}", stats.total);
    info!("Videos with dates: {}", stats.with_dates);
    info!("Videos without dates: {}", stats.without_dates());
    if let (Some(earliest), Some(latest)) = (&stats.earliest, &stats.latest) {
        info!("Date range: {} to {}", earliest, latest);
    }
    info!(path = %store.path().display(), "Saved catalog");

    Ok(FetchSummary {
        channel_name: catalog.channel_info.channel_name,
        pages,
        partial,
        stats,
    })
}

/// Catalog record for one upload, `None` for hidden entries
fn to_record(
    item: UploadItem,
    parser: &TitleDateParser,
    use_upload_date_fallback: bool,
) -> Option<VideoRecord> {
    if HIDDEN_TITLES.contains(&item.title.as_str()) {
        return None;
    }

    let upload_date = match item
        .published_at
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    {
        Some(date) => date,
        None => {
            warn!(
                video_id = %item.video_id,
                published_at = %item.published_at,
                "Skipping video with unreadable publish date"
            );
            return None;
        }
    };

    let recording_date = parser.recording_date(&item.title, upload_date, use_upload_date_fallback);

    Some(VideoRecord {
        url: VideoRecord::watch_url(&item.video_id),
        video_id: item.video_id,
        title: item.title,
        description: item.description,
        upload_date,
        recording_date,
        thumbnail: item.thumbnail_url,
    })
}
