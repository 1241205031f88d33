//! Catalog model
//!
//! The catalog is the whole persisted document: channel metadata plus every
//! video record in fetch order. Field names are the on-disk keys.

pub mod store;

pub use store::CatalogStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Channel display name used before the first fetch
pub const PLACEHOLDER_CHANNEL_NAME: &str = "Adam The Woo";

/// Channel handle used before the first fetch
pub const PLACEHOLDER_CHANNEL_HANDLE: &str = "@TheDailyWoo";

/// Channel metadata stored alongside the videos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub channel_id: String,
    pub channel_name: String,
    pub channel_handle: String,
    /// Uploads playlist the catalog was fetched from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads_playlist_id: Option<String>,
    /// Number of videos, refreshed on every save
    #[serde(default)]
    pub total_videos: usize,
    /// Last save instant, UTC ISO-8601
    pub last_updated: Option<String>,
}

impl ChannelInfo {
    /// Channel info for a catalog that has never been fetched
    pub fn placeholder() -> Self {
        Self {
            channel_id: String::new(),
            channel_name: PLACEHOLDER_CHANNEL_NAME.to_string(),
            channel_handle: PLACEHOLDER_CHANNEL_HANDLE.to_string(),
            uploads_playlist_id: None,
            total_videos: 0,
            last_updated: None,
        }
    }
}

/// One video in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Platform upload date (`YYYY-MM-DD`)
    pub upload_date: NaiveDate,
    /// Date the content was recorded (`YYYY-MM-DD`), if known
    ///
    /// Kept as text: contributors correct these by hand and the matcher
    /// skips values that no longer parse.
    pub recording_date: Option<String>,
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
}

impl VideoRecord {
    /// Canonical watch URL for a video id
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }

    /// Recording date parsed as a calendar date
    pub fn recording_date_parsed(&self) -> Option<NaiveDate> {
        self.recording_date
            .as_deref()
            .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
    }
}

/// The persisted document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub channel_info: ChannelInfo,
    pub videos: Vec<VideoRecord>,
}

impl Catalog {
    /// Empty catalog with placeholder channel info
    pub fn empty() -> Self {
        Self {
            channel_info: ChannelInfo::placeholder(),
            videos: Vec::new(),
        }
    }

    /// Build a freshly fetched catalog (full replace of any previous one)
    pub fn from_fetch(channel_info: ChannelInfo, videos: Vec<VideoRecord>) -> Self {
        let mut catalog = Self {
            channel_info,
            videos,
        };
        catalog.channel_info.total_videos = catalog.videos.len();
        catalog
    }

    /// True when nothing has been fetched yet
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Summary statistics over recording dates
    pub fn date_stats(&self) -> DateStats {
        let mut dates: Vec<&str> = self
            .videos
            .iter()
            .filter_map(|v| v.recording_date.as_deref())
            .collect();
        dates.sort_unstable();

        DateStats {
            total: self.videos.len(),
            with_dates: dates.len(),
            earliest: dates.first().map(|d| d.to_string()),
            latest: dates.last().map(|d| d.to_string()),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

/// Recording date coverage of a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStats {
    pub total: usize,
    pub with_dates: usize,
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

impl DateStats {
    pub fn without_dates(&self) -> usize {
        self.total - self.with_dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, recording: Option<&str>) -> VideoRecord {
        VideoRecord {
            video_id: id.to_string(),
            title: format!("Video {}", id),
            description: String::new(),
            upload_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            recording_date: recording.map(str::to_string),
            url: VideoRecord::watch_url(id),
            thumbnail: String::new(),
        }
    }

    #[test]
    fn test_placeholder_catalog() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.channel_info.channel_handle, "@TheDailyWoo");
        assert!(catalog.channel_info.last_updated.is_none());
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            VideoRecord::watch_url("abc123"),
            "https://www.youtube.com/watch?v=abc123"
        );
    }

    #[test]
    fn test_from_fetch_counts_videos() {
        let catalog = Catalog::from_fetch(
            ChannelInfo::placeholder(),
            vec![record("a", None), record("b", Some("2015-03-15"))],
        );
        assert_eq!(catalog.channel_info.total_videos, 2);
    }

    #[test]
    fn test_date_stats() {
        let catalog = Catalog::from_fetch(
            ChannelInfo::placeholder(),
            vec![
                record("a", Some("2016-01-01")),
                record("b", None),
                record("c", Some("2012-02-29")),
            ],
        );
        let stats = catalog.date_stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.with_dates, 2);
        assert_eq!(stats.without_dates(), 1);
        assert_eq!(stats.earliest.as_deref(), Some("2012-02-29"));
        assert_eq!(stats.latest.as_deref(), Some("2016-01-01"));
    }

    #[test]
    fn test_recording_date_parsed_rejects_garbage() {
        assert!(record("a", Some("sometime in 2015")).recording_date_parsed().is_none());
        assert!(record("a", None).recording_date_parsed().is_none());
        assert_eq!(
            record("a", Some("2015-03-15")).recording_date_parsed(),
            NaiveDate::from_ymd_opt(2015, 3, 15)
        );
    }

    #[test]
    fn test_wire_keys_are_snake_case() {
        let catalog = Catalog::from_fetch(ChannelInfo::placeholder(), vec![record("a", None)]);
        let json = serde_json::to_value(&catalog).unwrap();

        let channel = json["channel_info"].as_object().unwrap();
        for key in ["channel_id", "channel_name", "channel_handle", "total_videos", "last_updated"] {
            assert!(channel.contains_key(key), "missing {}", key);
        }

        let video = json["videos"][0].as_object().unwrap();
        for key in [
            "video_id",
            "title",
            "description",
            "upload_date",
            "recording_date",
            "url",
            "thumbnail",
        ] {
            assert!(video.contains_key(key), "missing {}", key);
        }
        assert!(video["recording_date"].is_null());
        assert_eq!(video["upload_date"], "2020-01-01");
    }
}
