// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - channel: audit a whole channel (description, every upload)
// - video:   audit specific videos by id
// - links:   audit text or URLs given on the command line (no API key needed)
//
// The shared knobs (pool size, timeout, domain lists) live in CheckArgs and
// are flattened into every subcommand; into_config() turns them into the
// AuditConfig the core consumes.
// =============================================================================

use crate::config::{
    to_owned_list, AuditConfig, ScanOptions, DEFAULT_BODY_LIMIT, DEFAULT_INTERNAL_DOMAINS,
    DEFAULT_POOL_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_TRACKING_KEYWORDS, DEFAULT_WHITELIST_DOMAINS,
};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "rot-guardian",
    version,
    about = "Audit a YouTube channel for dead links and dead end screen references",
    long_about = "rot-guardian scans video descriptions, top comments and end screens for links \
                  and references that no longer work. Bot walls and flaky hosts are told apart \
                  from genuinely dead targets with a set of conservative heuristics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a whole channel: its description and every upload
    ///
    /// Example: rot-guardian channel UCxxxxxxxx --comments 20
    Channel {
        /// Channel id (starts with "UC")
        #[arg(env = "CHANNEL_ID")]
        channel_id: String,

        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        scan: ScanArgs,

        /// Don't scan the channel's own description
        #[arg(long)]
        no_channel: bool,

        /// Skip videos this long or shorter, in seconds (e.g. 125 to skip Shorts)
        #[arg(long, value_name = "SECS")]
        min_duration: Option<u64>,

        #[command(flatten)]
        check: CheckArgs,

        /// Output results in JSON format instead of text
        #[arg(long)]
        json: bool,
    },

    /// Audit specific videos by id
    ///
    /// Example: rot-guardian video dQw4w9WgXcQ abc123
    Video {
        /// One or more video ids
        #[arg(required = true)]
        video_ids: Vec<String>,

        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        check: CheckArgs,

        #[arg(long)]
        json: bool,
    },

    /// Audit text or URLs passed directly (no end screens, no API key)
    ///
    /// Example: rot-guardian links "Shop: https://example.com/offer"
    Links {
        /// Text blobs or bare URLs
        #[arg(required = true)]
        inputs: Vec<String>,

        #[command(flatten)]
        check: CheckArgs,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// YouTube Data API v3 key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: String,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// How many top comments to sample per video (0 disables comment scanning)
    #[arg(long, default_value_t = 10)]
    pub comments: u32,

    /// Don't check end screen references
    #[arg(long)]
    pub no_end_cards: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Maximum number of links probed at once
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
    pub concurrency: usize,

    /// Per-link timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// How many bytes of each page to read when looking for a <title>
    #[arg(long, default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Trusted domains, comma separated (replaces the built-in list)
    #[arg(long, value_delimiter = ',')]
    pub whitelist: Option<Vec<String>>,

    /// Tracking/redirector keywords, comma separated (replaces the built-in list)
    #[arg(long, value_delimiter = ',')]
    pub tracking: Option<Vec<String>>,

    /// Platform domains that are never audited, comma separated (replaces the built-in list)
    #[arg(long, value_delimiter = ',')]
    pub internal: Option<Vec<String>>,
}

impl CheckArgs {
    pub fn into_config(self) -> AuditConfig {
        AuditConfig {
            pool_size: self.concurrency.max(1),
            timeout: Duration::from_secs(self.timeout.max(1)),
            body_limit: self.body_limit,
            internal_domains: self.internal.unwrap_or_else(|| to_owned_list(DEFAULT_INTERNAL_DOMAINS)),
            whitelist_domains: self.whitelist.unwrap_or_else(|| to_owned_list(DEFAULT_WHITELIST_DOMAINS)),
            tracking_keywords: self.tracking.unwrap_or_else(|| to_owned_list(DEFAULT_TRACKING_KEYWORDS)),
            ..AuditConfig::default()
        }
    }
}

impl ScanArgs {
    pub fn into_options(self, channel_description: bool, min_duration_secs: Option<u64>) -> ScanOptions {
        ScanOptions {
            channel_description,
            comments: self.comments,
            end_cards: !self.no_end_cards,
            min_duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_defaults() {
        let cli = Cli::try_parse_from(["rot-guardian", "links", "https://example.com"]).unwrap();
        let Commands::Links { inputs, check, json } = cli.command else {
            panic!("expected links subcommand");
        };
        assert_eq!(inputs, vec!["https://example.com"]);
        assert!(!json);

        let config = check.into_config();
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.whitelist_domains.contains(&"facebook.com".to_string()));
    }

    #[test]
    fn test_lists_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "rot-guardian",
            "links",
            "--whitelist",
            "a.com,b.com",
            "--concurrency",
            "8",
            "text",
        ])
        .unwrap();
        let Commands::Links { check, .. } = cli.command else {
            panic!("expected links subcommand");
        };
        let config = check.into_config();
        assert_eq!(config.whitelist_domains, vec!["a.com", "b.com"]);
        assert_eq!(config.pool_size, 8);
    }

    #[test]
    fn test_video_scan_options() {
        let cli = Cli::try_parse_from([
            "rot-guardian",
            "video",
            "--api-key",
            "k",
            "--comments",
            "0",
            "--no-end-cards",
            "abc",
            "def",
        ])
        .unwrap();
        let Commands::Video { video_ids, scan, .. } = cli.command else {
            panic!("expected video subcommand");
        };
        assert_eq!(video_ids, vec!["abc", "def"]);
        let options = scan.into_options(false, None);
        assert_eq!(options.comments, 0);
        assert!(!options.end_cards);
    }

    #[test]
    fn test_links_requires_input() {
        assert!(Cli::try_parse_from(["rot-guardian", "links"]).is_err());
    }
}
