//! otd-bot - "On This Day" daily publisher
//!
//! Runs one workflow per invocation and exits; scheduling is external.

use anyhow::{Context, Result};
use clap::Parser;
use otd_bot::cli::{Args, Command};
use otd_bot::credentials::{self, OAuthCredentials, RedditCredentials};
use otd_bot::services::{RedditClient, YouTubeClient};
use otd_bot::logging;
use otd_bot::workflow::{self, PlaylistOutcome, PlaylistPlan, PostOutcome, PostPlan};
use otd_common::catalog::CatalogStore;
use otd_common::config::{resolve_config_path, BotConfig};
use otd_common::{time, TodayKey};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = BotConfig::load(&config_path)?;
    if args.dry_run {
        config.features.dry_run = true;
    }

    logging::init(&config.logging)?;
    info!("Starting otd-bot v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", config_path.display());
    if config.features.dry_run {
        info!("*** DRY RUN MODE - NOTHING WILL BE PUBLISHED ***");
    }

    let store = CatalogStore::new(
        args.catalog
            .clone()
            .unwrap_or_else(|| config.storage.catalog_path.clone()),
    );
    let today = args.date.clone().unwrap_or_else(|| time::today(config.timezone()));

    match args.command {
        Command::Fetch => fetch(&config, &store).await,
        Command::Playlist => playlist(&config, &store, &today).await.map(|_| ()),
        Command::Post { playlist_url } => {
            post(&config, &store, &today, playlist_url.as_deref()).await
        }
        Command::Daily => {
            let playlist_url = workflow::daily_playlist_url(playlist(&config, &store, &today).await);
            post(&config, &store, &today, playlist_url.as_deref()).await
        }
        Command::Preview => {
            if let Some(catalog) = workflow::load_catalog(&store)? {
                println!("{}", today.formatted);
                println!();
                println!("{}", workflow::preview(&catalog, &today));
            }
            Ok(())
        }
    }
}

async fn fetch(config: &BotConfig, store: &CatalogStore) -> Result<()> {
    info!("YouTube Video Catalog Fetch");

    let api_key = credentials::required_var(credentials::YOUTUBE_API_KEY)?;
    let client = YouTubeClient::with_api_key(api_key).context("Create YouTube client")?;
    let handle = credentials::channel_handle(config);

    let summary = workflow::run_fetch(&client, &handle, &config.date_parsing, store).await?;
    if summary.partial {
        info!(
            "Fetch stopped early after {} pages; saved {} videos",
            summary.pages, summary.stats.total
        );
    }
    info!("FETCH COMPLETE: {} ({} videos)", summary.channel_name, summary.stats.total);
    Ok(())
}

async fn playlist(
    config: &BotConfig,
    store: &CatalogStore,
    today: &TodayKey,
) -> Result<PlaylistOutcome> {
    info!("On This Day: Playlist Update");

    let outcome = match workflow::plan_playlist(config, store, today)? {
        PlaylistPlan::Done(outcome) => outcome,
        PlaylistPlan::Ready(job) => {
            info!("Authenticating with YouTube...");
            let credentials = OAuthCredentials::from_env()?;
            let client = YouTubeClient::with_oauth(&credentials)
                .await
                .context("YouTube authentication failed")?;
            workflow::apply_playlist(&client, &job).await?
        }
    };

    if let PlaylistOutcome::Updated { url, added, total, .. } = &outcome {
        info!("PLAYLIST UPDATE COMPLETE: {}/{} videos, {}", added, total, url);
    }
    Ok(outcome)
}

async fn post(
    config: &BotConfig,
    store: &CatalogStore,
    today: &TodayKey,
    playlist_url: Option<&str>,
) -> Result<()> {
    info!("On This Day: Forum Post");

    let outcome = match workflow::plan_post(config, store, today, playlist_url)? {
        PostPlan::Done(outcome) => outcome,
        PostPlan::Ready(draft) => {
            info!("Authenticating with Reddit...");
            let credentials = RedditCredentials::from_env()?;
            let client = RedditClient::login(&credentials)
                .await
                .context("Reddit authentication failed")?;
            workflow::publish_post(&client, &draft).await?
        }
    };

    if let PostOutcome::Posted { url, .. } = &outcome {
        info!("POST COMPLETE: {}", url);
    }
    Ok(())
}
