// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl:   find a site's sitemaps and print every URL they reference
// - resolve: only show which sitemap URLs a crawl would start from
//
// Tuning flags (user agent, timeout, concurrency, URL limit) can also come
// from environment variables, which is handy in CI.
// =============================================================================

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use sitemap_crawlsync::config::{
    CrawlConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_SITEMAPS, DEFAULT_MAX_URLS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use sitemap_crawlsync::output::{FileKind, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-crawlsync",
    version,
    about = "Extract every URL from a website's sitemaps",
    long_about = "sitemap-crawlsync finds a site's sitemaps through robots.txt (or the /sitemap.xml \
                  convention), follows sitemap indexes recursively and prints every page URL they list, \
                  deduplicated and sorted."
)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a site's sitemaps and print the URLs they contain
    ///
    /// Example: sitemap-crawlsync crawl example.com --include /products/ --format csv
    Crawl {
        /// Domain, robots.txt URL or sitemap URL (e.g., example.com)
        target: String,

        #[command(flatten)]
        fetch: FetchArgs,

        #[command(flatten)]
        walk: WalkArgs,

        /// Only keep URLs containing this text (case-insensitive)
        #[arg(long)]
        include: Option<String>,

        /// Drop URLs containing this text (case-insensitive)
        #[arg(long)]
        exclude: Option<String>,

        /// Only keep URLs of this file kind
        #[arg(long, value_enum, default_value_t = FileKind::All)]
        kind: FileKind,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write results to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the sitemap URLs a crawl would start from
    ///
    /// Example: sitemap-crawlsync resolve example.com
    Resolve {
        /// Domain, robots.txt URL or sitemap URL
        target: String,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

// Flags that shape each HTTP request
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// User-Agent header sent with every request
    #[arg(long, env = "SITEMAP_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Seconds before a single request is given up on
    #[arg(
        long,
        env = "SITEMAP_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = RangedU64ValueParser::<u64>::new().range(1..)
    )]
    pub timeout: u64,
}

// Flags that shape the sitemap walk
#[derive(Args, Debug)]
pub struct WalkArgs {
    /// How many sitemaps to fetch at the same time
    #[arg(
        long,
        env = "SITEMAP_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub concurrency: usize,

    /// Stop collecting after this many URLs
    #[arg(
        long,
        env = "SITEMAP_MAX_URLS",
        default_value_t = DEFAULT_MAX_URLS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_urls: usize,

    /// Stop scheduling new sitemap documents after this many
    #[arg(
        long,
        env = "SITEMAP_MAX_SITEMAPS",
        default_value_t = DEFAULT_MAX_SITEMAPS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_sitemaps: usize,

    /// Don't follow sitemap index files into their child sitemaps
    #[arg(long)]
    pub no_recursive: bool,
}

impl FetchArgs {
    pub fn apply(&self, config: &mut CrawlConfig) {
        config.user_agent = self.user_agent.clone();
        config.timeout = Duration::from_secs(self.timeout);
    }
}

impl WalkArgs {
    pub fn apply(&self, config: &mut CrawlConfig) {
        config.concurrency = self.concurrency;
        config.max_urls = self.max_urls;
        config.max_sitemaps = self.max_sitemaps;
        config.recursive = !self.no_recursive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::try_parse_from(["sitemap-crawlsync", "crawl", "example.com"]).unwrap();

        let Commands::Crawl {
            target,
            fetch,
            walk,
            kind,
            format,
            ..
        } = cli.command
        else {
            panic!("expected crawl");
        };

        assert_eq!(target, "example.com");
        assert_eq!(kind, FileKind::All);
        assert_eq!(format, OutputFormat::Text);

        let mut config = CrawlConfig::default();
        fetch.apply(&mut config);
        walk.apply(&mut config);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.max_sitemaps, DEFAULT_MAX_SITEMAPS);
        assert!(config.recursive);
    }

    #[test]
    fn test_crawl_flags() {
        let cli = Cli::try_parse_from([
            "sitemap-crawlsync",
            "-vv",
            "crawl",
            "example.com",
            "--kind",
            "pdf",
            "--format",
            "csv",
            "--timeout",
            "5",
            "--max-urls",
            "100",
            "--max-sitemaps",
            "20",
            "--no-recursive",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);

        let Commands::Crawl {
            fetch,
            walk,
            kind,
            format,
            ..
        } = cli.command
        else {
            panic!("expected crawl");
        };

        assert_eq!(kind, FileKind::Pdf);
        assert_eq!(format, OutputFormat::Csv);

        let mut config = CrawlConfig::default();
        fetch.apply(&mut config);
        walk.apply(&mut config);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_urls, 100);
        assert_eq!(config.max_sitemaps, 20);
        assert!(!config.recursive);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = Cli::try_parse_from([
            "sitemap-crawlsync",
            "crawl",
            "example.com",
            "--concurrency",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_subcommand() {
        let cli = Cli::try_parse_from(["sitemap-crawlsync", "resolve", "example.com"]).unwrap();
        assert!(matches!(cli.command, Commands::Resolve { .. }));
    }
}
