// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results and exit with a proper code
//    (0 = URLs found, 1 = no URLs found, 2 = error)
//
// stdout only ever carries results, so `crawl ... > urls.txt` and
// `crawl ... --format csv | ...` work. Progress and logs go to stderr.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use sitemap_crawlsync::output::{write_urls, UrlFilter};
use sitemap_crawlsync::{crawl_until, resolve_seeds, CrawlConfig, CrawlReport, HttpFetcher};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr; RUST_LOG wins over -v flags when set
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,sitemap_crawlsync={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Crawl {
            target,
            fetch,
            walk,
            include,
            exclude,
            kind,
            format,
            output,
        } => {
            let mut config = CrawlConfig::default();
            fetch.apply(&mut config);
            walk.apply(&mut config);

            let report = handle_crawl(&target, &config).await?;

            let filter = UrlFilter::new(include.as_deref(), exclude.as_deref(), kind);
            let urls = filter.apply(&report.urls);
            print_summary(&report, urls.len());

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("could not create {}", path.display()))?;
                    write_urls(&urls, &report, format, BufWriter::new(file))?;
                    eprintln!("💾 Saved {} URL(s) to {}", urls.len(), path.display());
                }
                None => write_urls(&urls, &report, format, io::stdout().lock())?,
            }

            if report.urls.is_empty() {
                Ok(1) // Exit code 1 = nothing found
            } else {
                Ok(0)
            }
        }
        Commands::Resolve { target, fetch } => {
            let mut config = CrawlConfig::default();
            fetch.apply(&mut config);

            let fetcher = HttpFetcher::new(&config).context("could not build HTTP client")?;
            for seed in resolve_seeds(&target, &fetcher).await {
                println!("{}", seed);
            }
            Ok(0)
        }
    }
}

// Handles the 'crawl' subcommand up to the finished report
//
// Ctrl-C stops the crawl early; whatever was collected so far is kept.
async fn handle_crawl(target: &str, config: &CrawlConfig) -> Result<CrawlReport> {
    eprintln!("🔍 Looking for sitemaps on: {}", target);

    let fetcher = HttpFetcher::new(config).context("could not build HTTP client")?;
    let seeds = resolve_seeds(target, &fetcher).await;

    for seed in &seeds {
        eprintln!("   🗺️  {}", seed);
    }

    let shutdown = async {
        // If the handler can't be installed, never cancel
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    Ok(crawl_until(&seeds, &fetcher, config, shutdown).await)
}

// Prints a short human summary on stderr
fn print_summary(report: &CrawlReport, shown: usize) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   🗂️  Sitemaps fetched: {}", report.sitemaps_fetched);
    eprintln!("   ❌ Sitemaps failed: {}", report.failures.len());
    eprintln!("   🔗 Unique URLs: {}", report.urls.len());
    if shown != report.urls.len() {
        eprintln!("   🔎 Matching filters: {}", shown);
    }

    if report.truncated {
        eprintln!("⚠️  URL or sitemap limit reached; results are incomplete");
    }
    if report.cancelled {
        eprintln!("⏹️  Crawl cancelled; showing partial results");
    }
    if report.urls.is_empty() {
        eprintln!("⚠️  No URLs found. Check if the sitemap exists or is blocked.");
    }
    eprintln!();
}
