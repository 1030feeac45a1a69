// src/sitemap/mod.rs
// =============================================================================
// This module walks sitemap trees and extracts the page URLs they list.
//
// Submodules:
// - decode: gunzips .xml.gz bodies (with a raw-bytes fallback)
// - document: classifies one body as index / URL set / malformed / empty
// - state: the per-run visited set and result set
// - walker: the concurrent worklist that ties it all together
// =============================================================================

mod decode;
mod document;
mod state;
mod walker;

pub use document::{SitemapDocument, SitemapKind};
pub use walker::{crawl, crawl_until, CrawlReport, FailureReason, SitemapFailure};
