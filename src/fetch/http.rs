// src/fetch/http.rs
// =============================================================================
// The reqwest-backed Fetcher.
//
// Key functionality:
// - One shared Client (connection pooling across every sitemap we fetch)
// - Custom User-Agent, since many sites reject default client identifiers
// - Per-request timeout
// - Turns reqwest errors into our FetchError categories
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, FetchResponse, Fetcher};
use crate::config::CrawlConfig;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds a fetcher from the run's configuration
    //
    // Fails only if reqwest can't initialise its TLS backend.
    pub fn new(config: &CrawlConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(categorize_error)?.to_vec();

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - A URL reqwest refuses to build a request for
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_builder() {
        FetchError::InvalidUrl(error.to_string())
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            FetchError::Dns
        } else {
            FetchError::Connect
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchError::Tls
    } else {
        FetchError::Other(error.to_string())
    }
}
