// src/config.rs
// =============================================================================
// Tunable settings for one crawl run.
//
// Every value has a sensible default (see `Default` below). The CLI layer
// overrides them from flags or environment variables, then hands a finished
// CrawlConfig to the fetcher and the walker.
// =============================================================================

use std::time::Duration;

/// User-Agent sent with every request.
///
/// Many sites answer 403 to default client identifiers, so we present
/// ourselves as a browser-compatible bot.
pub const DEFAULT_USER_AGENT: &str =
    concat!("Mozilla/5.0 (compatible; SitemapCrawlSync/", env!("CARGO_PKG_VERSION"), ")");

/// Seconds before a single request is abandoned.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// How many sitemap documents may be in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Ceiling on collected URLs, guards against endless sitemap trees.
pub const DEFAULT_MAX_URLS: usize = 10_000;

/// Ceiling on scheduled sitemap documents. Index chains that never reach a
/// URL set would otherwise run forever.
pub const DEFAULT_MAX_SITEMAPS: usize = 1_000;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub concurrency: usize,
    pub max_urls: usize,
    pub max_sitemaps: usize,
    /// Follow the children of sitemap index documents.
    pub recursive: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            max_urls: DEFAULT_MAX_URLS,
            max_sitemaps: DEFAULT_MAX_SITEMAPS,
            recursive: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.max_urls, 10_000);
        assert_eq!(config.max_sitemaps, 1_000);
        assert!(config.recursive);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }
}
