// src/resolve/robots.rs
// =============================================================================
// Pulls `Sitemap:` directives out of a robots.txt file.
//
// robots.txt is line-oriented: `Key: value`, `#` starts a comment, keys are
// case-insensitive. Sitemap directives are global (not tied to a User-agent
// group), so unlike a full robots parser we can ignore grouping entirely.
// =============================================================================

use url::Url;

// Returns every Sitemap directive in declaration order
//
// Parameters:
//   txt: the robots.txt body
//   robots_url: where it came from, used to resolve relative values
//
// Duplicates are kept; the walker's visited set deals with them.
//
// Example:
//   "User-agent: *\nSitemap: https://example.com/sitemap.xml"
//   -> ["https://example.com/sitemap.xml"]
pub fn parse_sitemap_directives(txt: &str, robots_url: &Url) -> Vec<String> {
    let mut sitemaps = Vec::new();

    for line in txt.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // split_once stops at the first ':' so "https://" stays in the value
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        if !key.trim().eq_ignore_ascii_case("sitemap") {
            continue;
        }

        // Drop a trailing inline comment
        let value = value.split(" #").next().unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }

        match robots_url.join(value) {
            Ok(url) => sitemaps.push(url.to_string()),
            Err(_) => sitemaps.push(value.to_string()),
        }
    }

    sitemaps
}
