// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr so --json output stays clean)
// 2. Parse command-line arguments using clap
// 3. Build the run state: config, prober, optional end screen resolver
// 4. Feed channel / video / text items through the audit, one at a time
// 5. Print the report and exit with a proper code
//    (0 = clean, 1 = issues found, 2 = the run itself failed)
// =============================================================================

mod audit;
mod checker;
mod cli;
mod config;
mod endcard;
mod error;
mod report;
mod traits;
mod youtube;

use anyhow::{Context, Result};
use audit::{AuditRunState, ContentItem, ItemKind, SourceType, TextBlob};
use checker::LinkProber;
use clap::Parser;
use cli::{Cli, Commands};
use config::{AuditConfig, ScanOptions};
use endcard::EndCardResolver;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use youtube::{build_video_item, channel_item, load_videos, WatchPageFetcher, YouTubeClient};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rot_guardian=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Channel { channel_id, api, scan, no_channel, min_duration, check, json } => {
            let options = scan.into_options(!no_channel, min_duration);
            handle_channel_scan(&channel_id, &api.api_key, check.into_config(), options, json).await
        }
        Commands::Video { video_ids, api, scan, check, json } => {
            let options = scan.into_options(false, None);
            handle_video_scan(&video_ids, &api.api_key, check.into_config(), options, json).await
        }
        Commands::Links { inputs, check, json } => handle_links_scan(inputs, check.into_config(), json).await,
    }
}

// Builds the shared run state; end screens are only wired in when enabled
fn build_state(config: AuditConfig, client: Option<&YouTubeClient>, options: &ScanOptions) -> Result<AuditRunState> {
    let prober = LinkProber::new(&config).context("could not build HTTP client")?;
    let state = AuditRunState::new(config, Arc::new(prober));

    match client {
        Some(client) if options.end_cards => {
            let fetcher = WatchPageFetcher::new().context("could not build watch page client")?;
            let resolver = EndCardResolver::new(Arc::new(fetcher), Arc::new(client.clone()));
            Ok(state.with_end_cards(resolver))
        }
        _ => Ok(state),
    }
}

// Handles the 'channel' subcommand
//
// A failure to look up the channel, list its uploads, or load metadata for
// every batch of them ends the run with code 2 and a failure report; after
// that, failures are item-level and non-fatal.
async fn handle_channel_scan(
    channel_id: &str,
    api_key: &str,
    config: AuditConfig,
    options: ScanOptions,
    json: bool,
) -> Result<i32> {
    let client = YouTubeClient::new(api_key)?;
    let state = build_state(config, Some(&client), &options)?;

    info!(channel_id, "looking up channel");
    let channel = match client.channel(channel_id).await {
        Ok(channel) => channel,
        Err(e) => {
            let err = anyhow::Error::new(e).context(format!("channel lookup failed for {}", channel_id));
            report::print_failure(channel_id, &err, &state.finalize_report(), json)?;
            return Ok(2);
        }
    };

    if options.channel_description {
        state.run_audit(&channel_item(&channel)).await;
    }

    let video_ids = match &channel.uploads_playlist {
        Some(playlist) => match client.playlist_video_ids(playlist).await {
            Ok(ids) => ids,
            Err(e) => {
                let err = anyhow::Error::new(e).context("could not list channel uploads");
                report::print_failure(&channel.title, &err, &state.finalize_report(), json)?;
                return Ok(2);
            }
        },
        None => {
            warn!(channel_id, "channel has no uploads playlist");
            Vec::new()
        }
    };

    info!(uploads = video_ids.len(), "found uploads");
    let videos = match load_videos(&client, &video_ids, &options).await {
        Ok(videos) => videos,
        Err(e) => {
            let err = anyhow::Error::new(e).context("could not load video metadata");
            report::print_failure(&channel.title, &err, &state.finalize_report(), json)?;
            return Ok(2);
        }
    };
    scan_videos(&state, &client, &videos, &options).await;

    finish(&state, &channel.title, json)
}

// Handles the 'video' subcommand
async fn handle_video_scan(
    video_ids: &[String],
    api_key: &str,
    config: AuditConfig,
    options: ScanOptions,
    json: bool,
) -> Result<i32> {
    let client = YouTubeClient::new(api_key)?;
    let state = build_state(config, Some(&client), &options)?;

    let videos = match load_videos(&client, video_ids, &options).await {
        Ok(videos) => videos,
        Err(e) => {
            let err = anyhow::Error::new(e).context("could not load video metadata");
            report::print_failure("videos", &err, &state.finalize_report(), json)?;
            return Ok(2);
        }
    };
    if videos.len() < video_ids.len() {
        warn!(requested = video_ids.len(), found = videos.len(), "some videos could not be loaded");
    }
    scan_videos(&state, &client, &videos, &options).await;

    finish(&state, "videos", json)
}

// Handles the 'links' subcommand: every input is one text blob of one item
async fn handle_links_scan(inputs: Vec<String>, config: AuditConfig, json: bool) -> Result<i32> {
    let state = build_state(config, None, &ScanOptions::default())?;

    let item = ContentItem {
        id: "input".to_string(),
        title: "Command line input".to_string(),
        kind: ItemKind::Text,
        text_blobs: inputs.into_iter().map(|text| TextBlob::new(SourceType::Input, text)).collect(),
    };
    state.run_audit(&item).await;

    finish(&state, "input", json)
}

// Items are audited one after another; links inside each item run pooled
async fn scan_videos(state: &AuditRunState, client: &YouTubeClient, videos: &[youtube::VideoInfo], options: &ScanOptions) {
    let total = videos.len();
    for (i, video) in videos.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, total, video.title);
        let item = build_video_item(client, video, options).await;
        state.run_audit(&item).await;
    }
}

fn finish(state: &AuditRunState, target: &str, json: bool) -> Result<i32> {
    let report = state.finalize_report();
    report::print_report(target, &report, json)?;

    if report.has_issues() {
        Ok(1)
    } else {
        Ok(0)
    }
}
