// src/lib.rs
// =============================================================================
// The sitemap crawler as a library.
//
// Pipeline:
//   user input --resolve--> seed sitemap URLs --sitemap::crawl--> CrawlReport
//   CrawlReport --output--> filtered text / CSV / JSON
//
// Modules:
// - config:  tunables for one run (timeouts, concurrency, limits)
// - fetch:   the Fetcher trait and its reqwest implementation
// - resolve: domain / robots.txt / sitemap URL -> seed URLs
// - sitemap: the recursive (worklist-driven) sitemap walker
// - output:  filters and export formats
// =============================================================================

pub mod config;
pub mod fetch;
pub mod output;
pub mod resolve;
pub mod sitemap;

pub use config::CrawlConfig;
pub use fetch::{FetchError, FetchResponse, Fetcher, HttpFetcher};
pub use resolve::resolve_seeds;
pub use sitemap::{crawl, crawl_until, CrawlReport};
