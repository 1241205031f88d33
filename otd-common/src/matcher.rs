//! "On this day" matching
//!
//! Selects every catalog entry recorded on a given month and day in any
//! year, oldest first, and formats the selection as a markdown list.

use crate::catalog::{Catalog, VideoRecord};
use chrono::Datelike;

/// Text used in place of the list when nothing matched
pub const NO_VIDEOS_PLACEHOLDER: &str = "*No videos found for this date.*";

/// All records whose recording date falls on `month`/`day`, oldest first
///
/// Records without a recording date, or with one that does not parse as
/// `YYYY-MM-DD`, are skipped. The year is ignored, and February 29 only
/// matches a (2, 29) query.
pub fn videos_for_date(catalog: &Catalog, month: u32, day: u32) -> Vec<&VideoRecord> {
    let mut matches: Vec<&VideoRecord> = catalog
        .videos
        .iter()
        .filter(|video| {
            video
                .recording_date_parsed()
                .is_some_and(|date| date.month() == month && date.day() == day)
        })
        .collect();

    // YYYY-MM-DD sorts chronologically as text
    matches.sort_by(|a, b| a.recording_date.cmp(&b.recording_date));
    matches
}

/// Year label for a matched record, `Unknown` when the date is unusable
pub fn year_label(video: &VideoRecord) -> String {
    match (video.recording_date_parsed(), video.recording_date.as_deref()) {
        (Some(_), Some(text)) => text.chars().take(4).collect(),
        _ => "Unknown".to_string(),
    }
}

/// Markdown list of matched videos, one `**year:** [title](url)` per entry
pub fn format_video_list(videos: &[&VideoRecord]) -> String {
    if videos.is_empty() {
        return NO_VIDEOS_PLACEHOLDER.to_string();
    }

    videos
        .iter()
        .map(|video| {
            let title = if video.title.is_empty() {
                "Untitled"
            } else {
                video.title.as_str()
            };
            format!("**{}:** [{}]({})", year_label(video), title, video.url)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
