// src/output/mod.rs
// =============================================================================
// This module turns a finished crawl into something a person (or a
// spreadsheet) can use.
//
// Submodules:
// - filter: include/exclude substrings and image/PDF selection
//
// Formats:
// - text: one URL per line
// - csv:  a single "URL" column, ready for Google Sheets or Excel
// - json: the filtered URLs plus crawl statistics and failures
// =============================================================================

mod filter;

pub use filter::{FileKind, UrlFilter};

use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

use crate::sitemap::{CrawlReport, SitemapFailure};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// Shape of the JSON output
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    urls: &'a [String],
    total_found: usize,
    sitemaps_fetched: usize,
    sitemaps_visited: usize,
    failures: &'a [SitemapFailure],
    truncated: bool,
    cancelled: bool,
}

// Writes `urls` (already filtered and sorted) in the chosen format
//
// Parameters:
//   urls: what to print
//   report: the full crawl, for JSON statistics
//   format: text, csv or json
//   out: any writer (stdout, a file, a Vec in tests)
pub fn write_urls<W: Write>(
    urls: &[String],
    report: &CrawlReport,
    format: OutputFormat,
    mut out: W,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Text => {
            for url in urls {
                writeln!(out, "{}", url)?;
            }
            out.flush()?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["URL"])?;
            for url in urls {
                writer.write_record([url])?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                urls,
                total_found: report.urls.len(),
                sitemaps_fetched: report.sitemaps_fetched,
                sitemaps_visited: report.sitemaps_visited,
                failures: &report.failures,
                truncated: report.truncated,
                cancelled: report.cancelled,
            };
            serde_json::to_writer_pretty(&mut out, &output)?;
            writeln!(out)?;
            out.flush()?;
        }
    }

    Ok(())
}
