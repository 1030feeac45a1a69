// src/sitemap/state.rs
// =============================================================================
// Per-run bookkeeping for the walker.
//
// - VisitedSet: every sitemap URL we've already scheduled
// - ResultSet:  every unique leaf URL we've collected, up to a ceiling
//
// Both live for exactly one crawl and are owned by the walker's driver loop.
// =============================================================================

use std::collections::HashSet;

// Sitemap URLs already fetched or queued
//
// Marking happens when a URL is queued, not when its fetch finishes, so two
// index documents that list the same child can't both schedule it.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    // Returns true the first time a URL is seen, false ever after
    pub fn mark(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}

// Unique leaf URLs, bounded by `limit`
#[derive(Debug)]
pub struct ResultSet {
    urls: HashSet<String>,
    limit: usize,
}

impl ResultSet {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            urls: HashSet::new(),
            limit,
        }
    }

    // Adds a URL; returns false for duplicates and when full
    pub fn insert(&mut self, url: &str) -> bool {
        if self.is_full() || self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn is_full(&self) -> bool {
        self.urls.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    // Finalizes the set into A-Z order
    pub fn into_sorted(self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.into_iter().collect();
        urls.sort();
        urls
    }
}
