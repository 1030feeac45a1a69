// src/fetch/mod.rs
// =============================================================================
// This module is the crawler's only window onto the network.
//
// Submodules:
// - http: The real implementation, built on reqwest
//
// Everything else (the resolver, the sitemap walker) talks to the network
// through the `Fetcher` trait defined here. That lets tests swap in a fake
// that serves canned documents from memory.
//
// Rust concepts:
// - Traits: Shared behaviour that different types can implement
// - async-trait: Lets a trait contain async functions
// - thiserror: Derives std::error::Error for our own error enum
// =============================================================================

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

// What came back from one GET request
//
// We keep the raw bytes (not a String) because sitemaps may be gzip files.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code (200, 404, ...)
    pub status: u16,
    /// Content-Type header, if the server sent one
    pub content_type: Option<String>,
    /// Response body, exactly as received
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// True for 2xx status codes
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Why a request never produced a response
//
// Mirrors the categories a link checker cares about, so log lines say
// "timed out" instead of dumping a raw reqwest error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("could not resolve hostname")]
    Dns,
    #[error("connection failed")]
    Connect,
    #[error("TLS certificate error")]
    Tls,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
}

// The fetch capability the crawler depends on
//
// Implementations must be shareable between concurrent fetches, hence
// Send + Sync. One call = one attempt; there are no retries.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - The walker only needs "give me the bytes at this URL"
//    - Putting that behind a trait means tests can answer from a HashMap
//    - No network, no flakiness, and we can build cyclic sitemap graphs
//
// 2. What does #[async_trait] do?
//    - Traits can't (portably) hold async fns that return Send futures
//    - The macro rewrites them to return Pin<Box<dyn Future + Send>>
//
// 3. Why derive Clone on FetchError?
//    - The walker stores failures in its report and logs them too
//    - reqwest::Error isn't Clone, so we convert it into our own enum early
// -----------------------------------------------------------------------------
