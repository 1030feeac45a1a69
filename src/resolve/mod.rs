// src/resolve/mod.rs
// =============================================================================
// This module turns whatever the user typed into sitemap URLs to crawl.
//
// Accepted inputs:
// - A bare domain:          example.com
// - A robots.txt URL:       https://example.com/robots.txt
// - A direct sitemap URL:   https://example.com/sitemap_index.xml(.gz)
//
// Strategy:
// 1. Add https:// if the input has no scheme
// 2. Direct .xml / .xml.gz links are used as-is
// 3. Otherwise read the site's robots.txt and collect its Sitemap: lines
// 4. If that yields nothing, guess /sitemap.xml
//
// Nothing in here returns an error. The worst case is the /sitemap.xml
// guess, and the walker will report if that guess doesn't exist.
// =============================================================================

mod robots;

pub use robots::parse_sitemap_directives;

use tracing::{debug, info};
use url::Url;

use crate::fetch::Fetcher;

// Resolves a crawl target into one or more seed sitemap URLs
//
// Parameters:
//   target: raw user input (domain, robots.txt URL or sitemap URL)
//   fetcher: used for the single robots.txt request
//
// Returns: at least one URL, in the order they should be crawled
pub async fn resolve_seeds<F>(target: &str, fetcher: &F) -> Vec<String>
where
    F: Fetcher + ?Sized,
{
    let normalized = normalize_target(target);

    let url = match Url::parse(&normalized) {
        Ok(url) => url,
        Err(e) => {
            // Can't even find a host, so robots.txt is out of reach
            debug!(target = %normalized, error = %e, "unparseable target, guessing sitemap.xml");
            return vec![format!("{}/sitemap.xml", normalized.trim_end_matches('/'))];
        }
    };

    if is_direct_sitemap(&url) {
        info!(url = %url, "using direct sitemap URL");
        return vec![url.to_string()];
    }

    let root = site_root(&url);

    if let Ok(robots_url) = root.join("robots.txt") {
        let sitemaps = discover_from_robots(&robots_url, fetcher).await;
        if !sitemaps.is_empty() {
            info!(count = sitemaps.len(), "found sitemaps in robots.txt");
            return sitemaps;
        }
    }

    let fallback = fallback_sitemap(&root);
    info!(url = %fallback, "no Sitemap directive found, trying default");
    vec![fallback]
}

// Adds a scheme to bare domains
//
// Example:
//   "  example.com " -> "https://example.com"
//   "http://example.com" -> unchanged
pub fn normalize_target(target: &str) -> String {
    let trimmed = target.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

// True when the URL path already names a sitemap file
pub fn is_direct_sitemap(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    path.ends_with(".xml") || path.ends_with(".xml.gz")
}

// Fetches robots.txt and returns its Sitemap: directives
//
// Any failure (network, non-2xx, empty body) yields an empty list.
async fn discover_from_robots<F>(robots_url: &Url, fetcher: &F) -> Vec<String>
where
    F: Fetcher + ?Sized,
{
    debug!(url = %robots_url, "checking robots.txt");

    match fetcher.fetch(robots_url.as_str()).await {
        Ok(response) if response.is_success() => {
            let txt = String::from_utf8_lossy(&response.body);
            parse_sitemap_directives(&txt, robots_url)
        }
        Ok(response) => {
            debug!(url = %robots_url, status = response.status, "robots.txt not available");
            Vec::new()
        }
        Err(e) => {
            debug!(url = %robots_url, error = %e, "robots.txt fetch failed");
            Vec::new()
        }
    }
}

// {scheme}://{host}[:port]/ with path, query and fragment stripped
fn site_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

fn fallback_sitemap(root: &Url) -> String {
    match root.join("sitemap.xml") {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}sitemap.xml", root),
    }
}
