//! Command-line interface

use clap::{Parser, Subcommand};
use otd_common::TodayKey;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "otd-bot")]
#[command(about = "Publishes the channel's \"On This Day\" playlist and forum post")]
#[command(version)]
pub struct Args {
    /// Configuration file (falls back to OTD_CONFIG, then config/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Catalog file, overriding storage.catalog_path
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Log what would be published without calling any write API
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use this month and day instead of today
    #[arg(long, global = true, value_name = "MM-DD", value_parser = parse_month_day)]
    pub date: Option<TodayKey>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the video catalog from the channel's uploads
    Fetch,
    /// Refresh today's playlist
    Playlist,
    /// Publish today's forum post
    Post {
        /// Playlist link for the post body
        #[arg(long, value_name = "URL")]
        playlist_url: Option<String>,
    },
    /// Refresh the playlist, then post with its link
    Daily,
    /// Print today's matches without publishing anything
    Preview,
}

/// Parse `MM-DD` (also `M-D`) into a date key
pub fn parse_month_day(text: &str) -> Result<TodayKey, String> {
    let (month, day) = text
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("expected MM-DD, got {:?}", text))?;

    let month: u32 = month
        .parse()
        .map_err(|_| format!("invalid month in {:?}", text))?;
    let day: u32 = day.parse().map_err(|_| format!("invalid day in {:?}", text))?;

    TodayKey::from_month_day(month, day).ok_or_else(|| format!("no such date: {:?}", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_day() {
        let key = parse_month_day("03-05").unwrap();
        assert_eq!((key.month, key.day), (3, 5));
        assert_eq!(key.formatted, "March 05");

        assert_eq!(parse_month_day("2-29").unwrap().formatted, "February 29");
    }

    #[test]
    fn test_parse_month_day_rejects_bad_input() {
        assert!(parse_month_day("0305").is_err());
        assert!(parse_month_day("13-01").is_err());
        assert!(parse_month_day("02-30").is_err());
        assert!(parse_month_day("March-05").is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "otd-bot",
            "post",
            "--dry-run",
            "--date",
            "12-25",
            "--playlist-url",
            "https://www.youtube.com/playlist?list=PL1",
        ])
        .unwrap();

        assert!(args.dry_run);
        assert_eq!(args.date.unwrap().day, 25);
        match args.command {
            Command::Post { playlist_url } => {
                assert_eq!(playlist_url.as_deref(), Some("https://www.youtube.com/playlist?list=PL1"))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["otd-bot"]).is_err());
    }
}
