// src/output/filter.rs
// =============================================================================
// Narrows the crawl result down to the URLs the user asked for.
//
// Three independent checks, all case-insensitive:
// - include: URL must contain this substring
// - exclude: URL must NOT contain this substring
// - kind:    URL must end in an image or PDF extension
// =============================================================================

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif|svg|bmp|tiff)$").expect("image pattern is valid")
});

static PDF_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.pdf$").expect("pdf pattern is valid"));

/// Which file types to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FileKind {
    #[default]
    All,
    Image,
    Pdf,
}

impl FileKind {
    pub fn matches(self, url: &str) -> bool {
        match self {
            FileKind::All => true,
            FileKind::Image => IMAGE_EXTENSION.is_match(url),
            FileKind::Pdf => PDF_EXTENSION.is_match(url),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    include: Option<String>,
    exclude: Option<String>,
    kind: FileKind,
}

impl UrlFilter {
    // Blank include/exclude strings are treated as "no filter"
    pub fn new(include: Option<&str>, exclude: Option<&str>, kind: FileKind) -> Self {
        let prepare = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
        };

        Self {
            include: prepare(include),
            exclude: prepare(exclude),
            kind,
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        let lower = url.to_lowercase();

        if let Some(include) = &self.include {
            if !lower.contains(include.as_str()) {
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if lower.contains(exclude.as_str()) {
                return false;
            }
        }

        self.kind.matches(url)
    }

    // Keeps matching URLs, preserving their order
    pub fn apply(&self, urls: &[String]) -> Vec<String> {
        urls.iter().filter(|u| self.matches(u)).cloned().collect()
    }
}
