// src/sitemap/walker.rs
// =============================================================================
// Walks a sitemap graph from its seed URLs down to the leaf page URLs.
//
// How it works:
// 1. Seed URLs go into a queue (and into the visited set)
// 2. Up to `concurrency` queued sitemaps are fetched at the same time
// 3. Each finished fetch is classified:
//    - index     -> its children are queued (unless already visited)
//    - URL set   -> its locations go into the result set
//    - malformed -> salvaged locations are split between the two
// 4. Repeat until the queue is empty, the URL or sitemap ceiling is hit,
//    or the caller cancels
//
// Why a queue instead of recursion?
// - Sitemap graphs come from untrusted servers and may be cyclic or huge
// - An explicit worklist keeps memory use visible and makes cancellation easy
//
// Only this driver loop touches the visited and result sets. Fetches run
// concurrently, but their outcomes are absorbed one at a time, so "have we
// seen this URL?" and "remember this URL" can never interleave.
// =============================================================================

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::decode::decode_body;
use super::document::{SitemapDocument, SitemapKind};
use super::state::{ResultSet, VisitedSet};
use crate::config::CrawlConfig;
use crate::fetch::{FetchError, FetchResponse, Fetcher};

/// Why a single sitemap contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("{error}")]
    Request { error: FetchError },
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("empty response body")]
    EmptyBody,
}

/// A sitemap that was scheduled but could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapFailure {
    pub url: String,
    #[serde(flatten)]
    pub reason: FailureReason,
}

/// Everything one crawl produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    /// Unique leaf URLs, sorted A-Z
    pub urls: Vec<String>,
    /// Sitemap documents fetched and parsed
    pub sitemaps_fetched: usize,
    /// Sitemap URLs scheduled, including failed ones
    pub sitemaps_visited: usize,
    pub failures: Vec<SitemapFailure>,
    /// The URL or sitemap ceiling stopped the crawl early
    pub truncated: bool,
    /// The caller aborted the crawl; `urls` holds what was found until then
    pub cancelled: bool,
}

// Crawls every seed to completion
//
// Parameters:
//   seeds: sitemap URLs from the resolver
//   fetcher: the network (or a fake, in tests)
//   config: concurrency, timeout, ceiling and recursion settings
pub async fn crawl<F>(seeds: &[String], fetcher: &F, config: &CrawlConfig) -> CrawlReport
where
    F: Fetcher + ?Sized,
{
    crawl_until(seeds, fetcher, config, std::future::pending()).await
}

// Like `crawl`, but stops early when `shutdown` completes
//
// In-flight fetches are dropped; the report keeps every URL absorbed before
// the shutdown and is marked `cancelled`.
pub async fn crawl_until<F, S>(
    seeds: &[String],
    fetcher: &F,
    config: &CrawlConfig,
    shutdown: S,
) -> CrawlReport
where
    F: Fetcher + ?Sized,
    S: Future<Output = ()>,
{
    let mut run = CrawlRun::new(config);
    for seed in seeds {
        run.schedule(&normalize_seed(seed));
    }

    let concurrency = config.concurrency.max(1);
    let mut in_flight = FuturesUnordered::new();
    tokio::pin!(shutdown);

    loop {
        // Top up the in-flight pool from the queue
        while in_flight.len() < concurrency && !run.results.is_full() {
            let Some(url) = run.pending.pop_front() else {
                break;
            };
            in_flight.push(fetch_sitemap(fetcher, url, config.timeout));
        }

        if in_flight.is_empty() {
            break;
        }

        tokio::select! {
            biased;

            () = &mut shutdown => {
                run.cancelled = true;
                break;
            }
            Some((url, outcome)) = in_flight.next() => {
                run.absorb(url, outcome);
            }
        }

        // Fetchers that answer without awaiting would otherwise starve
        // timers and other tasks
        tokio::task::yield_now().await;
    }

    if run.cancelled {
        warn!(
            abandoned = in_flight.len(),
            collected = run.results.len(),
            "crawl cancelled, returning partial results"
        );
    }

    run.finish()
}

// Seeds get the same URL normalization as child references
fn normalize_seed(seed: &str) -> String {
    let seed = seed.trim();
    Url::parse(seed)
        .map(String::from)
        .unwrap_or_else(|_| seed.to_string())
}

// One fetch with the run's timeout applied, whatever the Fetcher does
async fn fetch_sitemap<F>(
    fetcher: &F,
    url: String,
    timeout: Duration,
) -> (String, Result<FetchResponse, FetchError>)
where
    F: Fetcher + ?Sized,
{
    debug!(url = %url, "fetching sitemap");

    let outcome = match tokio::time::timeout(timeout, fetcher.fetch(&url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    };

    (url, outcome)
}

// Mutable state of a single crawl
struct CrawlRun {
    pending: VecDeque<String>,
    visited: VisitedSet,
    results: ResultSet,
    max_sitemaps: usize,
    failures: Vec<SitemapFailure>,
    fetched: usize,
    recursive: bool,
    truncated: bool,
    cancelled: bool,
}

impl CrawlRun {
    fn new(config: &CrawlConfig) -> Self {
        Self {
            pending: VecDeque::new(),
            visited: VisitedSet::default(),
            results: ResultSet::with_limit(config.max_urls),
            max_sitemaps: config.max_sitemaps,
            failures: Vec::new(),
            fetched: 0,
            recursive: config.recursive,
            truncated: false,
            cancelled: false,
        }
    }

    // Queues a sitemap URL unless it was seen before
    fn schedule(&mut self, url: &str) {
        if url.is_empty() {
            return;
        }

        if self.visited.len() >= self.max_sitemaps && !self.visited.contains(url) {
            if !self.truncated {
                warn!(limit = self.max_sitemaps, "sitemap limit reached, not scheduling more");
            }
            self.truncated = true;
            return;
        }

        if self.visited.mark(url) {
            self.pending.push_back(url.to_string());
        } else {
            debug!(url = %url, "already visited, skipping");
        }
    }

    fn absorb(&mut self, url: String, outcome: Result<FetchResponse, FetchError>) {
        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                self.fail(url, FailureReason::Request { error });
                return;
            }
        };

        if !response.is_success() {
            self.fail(
                url,
                FailureReason::Status {
                    status: response.status,
                },
            );
            return;
        }

        if response.body.is_empty() {
            self.fail(url, FailureReason::EmptyBody);
            return;
        }

        self.fetched += 1;

        let body = decode_body(&url, response.content_type.as_deref(), response.body);
        let document = SitemapDocument::parse(url, &body);

        match document.kind {
            SitemapKind::Index { sitemaps } => {
                info!(url = %document.url, children = sitemaps.len(), "found sitemap index");
                self.follow(&document.url, sitemaps);
            }
            SitemapKind::UrlSet { urls } => {
                info!(url = %document.url, count = urls.len(), "extracted URLs");
                self.collect(urls);
            }
            SitemapKind::Unparseable { sitemaps, urls } => {
                warn!(
                    url = %document.url,
                    sitemaps = sitemaps.len(),
                    urls = urls.len(),
                    "malformed sitemap, salvaged <loc> values"
                );
                self.follow(&document.url, sitemaps);
                self.collect(urls);
            }
            SitemapKind::Unrecognized => {
                debug!(url = %document.url, "no sitemap entries in document");
            }
        }
    }

    fn fail(&mut self, url: String, reason: FailureReason) {
        warn!(url = %url, reason = %reason, "sitemap failed");
        self.failures.push(SitemapFailure { url, reason });
    }

    // Queues child sitemaps of an index
    fn follow(&mut self, parent: &str, children: Vec<String>) {
        if !self.recursive {
            debug!(url = %parent, skipped = children.len(), "recursion disabled, not following");
            return;
        }

        let base = Url::parse(parent).ok();
        for child in children {
            let resolved = base
                .as_ref()
                .and_then(|base| base.join(&child).ok())
                .map(String::from)
                .unwrap_or(child);
            self.schedule(&resolved);
        }
    }

    fn collect(&mut self, urls: Vec<String>) {
        for url in urls {
            if self.results.is_full() {
                self.truncated = true;
                break;
            }
            self.results.insert(&url);
        }
    }

    fn finish(self) -> CrawlReport {
        let truncated = self.truncated || (self.results.is_full() && !self.pending.is_empty());
        if truncated {
            warn!(
                urls = self.results.len(),
                sitemaps = self.visited.len(),
                "crawl limit reached, results are incomplete"
            );
        }

        CrawlReport {
            urls: self.results.into_sorted(),
            sitemaps_fetched: self.fetched,
            sitemaps_visited: self.visited.len(),
            failures: self.failures,
            truncated,
            cancelled: self.cancelled,
        }
    }
}
