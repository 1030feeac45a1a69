// src/sitemap/decode.rs
// =============================================================================
// Gunzips sitemap bodies when they look compressed.
//
// reqwest already handles `Content-Encoding: gzip`. What it can't handle is a
// `.xml.gz` file served as an opaque `application/gzip` download; the body we
// receive is then the gzip file itself. Some servers also lie: they call the
// file gzip but serve plain XML. Decompression failure therefore falls back to
// the raw bytes instead of failing the node.
// =============================================================================

use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// Returns the body to parse, decompressed if it was gzip
//
// Parameters:
//   url: where the body came from (checked for a .gz suffix)
//   content_type: the response Content-Type header, if any
//   body: raw response bytes
pub fn decode_body(url: &str, content_type: Option<&str>, body: Vec<u8>) -> Vec<u8> {
    if !looks_gzipped(url, content_type, &body) {
        return body;
    }

    let mut decoded = Vec::new();
    match GzDecoder::new(body.as_slice()).read_to_end(&mut decoded) {
        Ok(_) => decoded,
        Err(e) => {
            debug!(url = %url, error = %e, "gzip decode failed, using raw body");
            body
        }
    }
}

fn looks_gzipped(url: &str, content_type: Option<&str>, body: &[u8]) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.to_ascii_lowercase().ends_with(".gz") {
        return true;
    }

    if let Some(ct) = content_type {
        if ct.to_ascii_lowercase().contains("gzip") {
            return true;
        }
    }

    body.starts_with(&GZIP_MAGIC)
}
