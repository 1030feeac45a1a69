// src/sitemap/document.rs
// =============================================================================
// Classifies one fetched sitemap body.
//
// A sitemap is one of:
// - an index:   <sitemapindex><sitemap><loc>child.xml</loc></sitemap>...
// - a URL set:  <urlset><url><loc>https://page</loc></url>...
//
// Element names are matched by local name only, so `<loc>`, `<sm:loc>` and a
// `<loc>` under any default xmlns all look the same to us. That covers the
// 0.9 schema, the old Google schemas and the image extension in one pass.
//
// Documents that are not well-formed XML (truncated downloads, PHP templates
// that leak warnings into the output) still get a second chance: we scan the
// raw text for <loc>...</loc> and guess which values are nested sitemaps.
// =============================================================================

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

// Matches <loc>..</loc>, optionally namespace-prefixed, across newlines
static LOC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:[a-z0-9_-]+:)?loc\s*>(.*?)</(?:[a-z0-9_-]+:)?loc\s*>")
        .expect("loc pattern is valid")
});

/// What a sitemap document turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapKind {
    /// `sitemap/loc` entries: references to more sitemaps.
    Index { sitemaps: Vec<String> },
    /// `url/loc` and `image/loc` entries: the leaf URLs we're after.
    UrlSet { urls: Vec<String> },
    /// Not well-formed XML; locations salvaged by pattern matching.
    Unparseable { sitemaps: Vec<String>, urls: Vec<String> },
    /// Well-formed, but no entries of either kind.
    Unrecognized,
}

/// One fetched-and-parsed sitemap resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    pub url: String,
    pub kind: SitemapKind,
}

impl SitemapDocument {
    // Parses a (decompressed) body fetched from `url`
    //
    // Never fails: malformed input becomes Unparseable, empty input
    // becomes Unrecognized.
    pub fn parse(url: impl Into<String>, body: &[u8]) -> Self {
        let url = url.into();
        let text = String::from_utf8_lossy(body);
        let text = text.trim_start_matches('\u{feff}');

        let kind = match read_entries(text) {
            Ok(entries) => entries.classify(),
            Err(e) => {
                debug!(url = %url, error = %e, "XML parse failed, scanning for <loc> tags");
                salvage_locations(text)
            }
        };

        Self { url, kind }
    }
}

#[derive(Debug, Error)]
enum ParseError {
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },
    #[error("document ended inside <{0}>")]
    Truncated(String),
}

#[derive(Debug, Default)]
struct Entries {
    sitemaps: Vec<String>,
    urls: Vec<String>,
    images: Vec<String>,
}

impl Entries {
    fn classify(self) -> SitemapKind {
        if !self.sitemaps.is_empty() {
            SitemapKind::Index {
                sitemaps: self.sitemaps,
            }
        } else if !self.urls.is_empty() || !self.images.is_empty() {
            let mut urls = self.urls;
            urls.extend(self.images);
            SitemapKind::UrlSet { urls }
        } else {
            SitemapKind::Unrecognized
        }
    }
}

// Walks the XML event stream collecting <loc> values by parent element
fn read_entries(xml: &str) -> Result<Entries, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut entries = Entries::default();
    // Local names of the currently open elements, lowercased
    let mut open: Vec<String> = Vec::new();
    let mut loc_text = String::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| ParseError::Xml {
                position: reader.buffer_position() as u64,
                message: e.to_string(),
            })?;

        match event {
            Event::Start(e) => {
                let name = local_name(e.local_name().as_ref());
                if name == "loc" {
                    loc_text.clear();
                }
                open.push(name);
            }
            Event::End(_) => {
                let closed = open.pop();
                if closed.as_deref() == Some("loc") {
                    let value = loc_text.trim();
                    if !value.is_empty() {
                        match open.last().map(String::as_str) {
                            Some("sitemap") => entries.sitemaps.push(value.to_string()),
                            Some("url") => entries.urls.push(value.to_string()),
                            Some("image") => entries.images.push(value.to_string()),
                            _ => {}
                        }
                    }
                }
            }
            Event::Text(e) if is_inside_loc(&open) => {
                let text = e.unescape().map_err(|e| ParseError::Xml {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                loc_text.push_str(&text);
            }
            Event::CData(e) if is_inside_loc(&open) => {
                loc_text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    // quick-xml is happy to stop at EOF with elements still open
    if let Some(unclosed) = open.pop() {
        return Err(ParseError::Truncated(unclosed));
    }

    Ok(entries)
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn is_inside_loc(open: &[String]) -> bool {
    open.last().map(String::as_str) == Some("loc")
}

// Regex fallback for documents the XML reader rejected
fn salvage_locations(text: &str) -> SitemapKind {
    let mut sitemaps = Vec::new();
    let mut urls = Vec::new();

    for capture in LOC_PATTERN.captures_iter(text) {
        let value = clean_loc(&capture[1]);
        if value.is_empty() {
            continue;
        }

        if looks_like_sitemap(&value) {
            sitemaps.push(value);
        } else {
            urls.push(value);
        }
    }

    SitemapKind::Unparseable { sitemaps, urls }
}

// Trims, unwraps CDATA and decodes the predefined XML entities
fn clean_loc(raw: &str) -> String {
    let mut value = raw.trim();
    if let Some(inner) = value
        .strip_prefix("<![CDATA[")
        .and_then(|v| v.strip_suffix("]]>"))
    {
        value = inner.trim();
    }

    match quick_xml::escape::unescape(value) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => value.to_string(),
    }
}

// Heuristic used only for salvaged locations: does this point at another sitemap?
pub fn looks_like_sitemap(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.contains(".xml") || lower.contains(".php") || lower.contains("sitemap")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(xml: &str) -> SitemapKind {
        SitemapDocument::parse("https://example.com/sitemap.xml", xml.as_bytes()).kind
    }

    #[test]
    fn test_index_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap>
            <loc>https://example.com/sitemap-1.xml</loc>
            <lastmod>2024-01-15</lastmod>
          </sitemap>
          <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
        </sitemapindex>"#;

        assert_eq!(
            kind_of(xml),
            SitemapKind::Index {
                sitemaps: vec![
                    "https://example.com/sitemap-1.xml".to_string(),
                    "https://example.com/sitemap-2.xml".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_urlset_document_trims_values() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>
            https://example.com/page1
          </loc></url>
          <url><loc>https://example.com/page2</loc><priority>0.8</priority></url>
          <url><loc>   </loc></url>
        </urlset>"#;

        assert_eq!(
            kind_of(xml),
            SitemapKind::UrlSet {
                urls: vec![
                    "https://example.com/page1".to_string(),
                    "https://example.com/page2".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_namespace_does_not_matter() {
        let with_ns = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>https://example.com/a</loc></url>
        </urlset>"#;
        let without_ns = r#"<urlset>
          <url><loc>https://example.com/a</loc></url>
        </urlset>"#;
        let prefixed = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sm:url><sm:loc>https://example.com/a</sm:loc></sm:url>
        </sm:urlset>"#;

        assert_eq!(kind_of(with_ns), kind_of(without_ns));
        assert_eq!(kind_of(with_ns), kind_of(prefixed));
    }

    #[test]
    fn test_image_locations_are_leaves() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
                xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
          <url>
            <loc>https://example.com/gallery</loc>
            <image:image><image:loc>https://example.com/photo.jpg</image:loc></image:image>
          </url>
        </urlset>"#;

        assert_eq!(
            kind_of(xml),
            SitemapKind::UrlSet {
                urls: vec![
                    "https://example.com/gallery".to_string(),
                    "https://example.com/photo.jpg".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_index_wins_over_urls() {
        let xml = r#"<root>
          <sitemap><loc>https://example.com/child.xml</loc></sitemap>
          <url><loc>https://example.com/page</loc></url>
        </root>"#;

        assert_eq!(
            kind_of(xml),
            SitemapKind::Index {
                sitemaps: vec!["https://example.com/child.xml".to_string()]
            }
        );
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = r#"<urlset>
          <url><loc>https://example.com/page?foo=1&amp;bar=2</loc></url>
          <url><loc><![CDATA[https://example.com/cdata]]></loc></url>
        </urlset>"#;

        assert_eq!(
            kind_of(xml),
            SitemapKind::UrlSet {
                urls: vec![
                    "https://example.com/page?foo=1&bar=2".to_string(),
                    "https://example.com/cdata".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_empty_urlset_is_unrecognized() {
        let xml = r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
        assert_eq!(kind_of(xml), SitemapKind::Unrecognized);
        assert_eq!(kind_of(""), SitemapKind::Unrecognized);
    }

    #[test]
    fn test_loc_outside_known_parents_is_ignored() {
        let xml = r#"<feed><entry><loc>https://example.com/x</loc></entry></feed>"#;
        assert_eq!(kind_of(xml), SitemapKind::Unrecognized);
    }

    #[test]
    fn test_truncated_document_is_salvaged() {
        let xml = "<urlset><url><loc>http://a.test/x</loc></url><broken";
        assert_eq!(
            kind_of(xml),
            SitemapKind::Unparseable {
                sitemaps: vec![],
                urls: vec!["http://a.test/x".to_string()],
            }
        );
    }

    #[test]
    fn test_salvage_splits_nested_sitemaps_from_leaves() {
        let text = r#"<b>Warning</b>: PHP notice in sitemap.php on line 3
        <sitemapindex>
          <sitemap><loc>https://example.com/post-sitemap.xml</loc></sitemap>
          <sitemap><loc>https://example.com/index.php?sitemap=pages</loc></sitemap>
          <url><loc>https://example.com/about &amp; more</loc></url>
        </urlset>"#;

        assert_eq!(
            kind_of(text),
            SitemapKind::Unparseable {
                sitemaps: vec![
                    "https://example.com/post-sitemap.xml".to_string(),
                    "https://example.com/index.php?sitemap=pages".to_string(),
                ],
                urls: vec!["https://example.com/about & more".to_string()],
            }
        );
    }

    #[test]
    fn test_looks_like_sitemap() {
        assert!(looks_like_sitemap("https://example.com/a.XML"));
        assert!(looks_like_sitemap("https://example.com/feed.php"));
        assert!(looks_like_sitemap("https://example.com/Sitemap/pages"));
        assert!(!looks_like_sitemap("https://example.com/products/shoe"));
    }
}
