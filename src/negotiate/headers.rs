//! Response-header rules for negotiated endpoints.

use rustc_hash::FxHashSet;

use super::model::{CONTENT_ENCODING, CONTENT_TYPE, ETAG, Endpoint, ResponseHeader, VARY, WEAK_PREFIX};

/// Append `Content-Encoding` and `Vary` unless an encoding header is present.
///
/// Returns whether headers were added. Existing headers are never removed.
pub fn add_encoding_headers(endpoint: &mut Endpoint, encoding: &str) -> bool {
    if endpoint.has_header(CONTENT_ENCODING) {
        return false;
    }
    endpoint
        .response_headers
        .push(ResponseHeader::new(CONTENT_ENCODING, encoding));
    endpoint
        .response_headers
        .push(ResponseHeader::new(VARY, CONTENT_ENCODING));
    true
}

/// Demote a validator to weak comparison. Already-weak values are unchanged.
pub fn weaken(etag: &str) -> String {
    if etag.starts_with(WEAK_PREFIX) {
        etag.to_string()
    } else {
        format!("{WEAK_PREFIX}{etag}")
    }
}

/// Headers for an endpoint that serves `compressed`'s bytes at `origin`'s route.
///
/// Compressed headers come first, without `Content-Type`. Origin headers
/// follow: `Content-Type` is always kept, `ETag` is kept as a weak
/// validator, anything else the compressed side already set is dropped.
pub fn merge(compressed: &Endpoint, origin: &Endpoint) -> Vec<ResponseHeader> {
    let mut headers = Vec::with_capacity(compressed.response_headers.len() + origin.response_headers.len());
    let mut seen = FxHashSet::default();

    for header in &compressed.response_headers {
        if header.is(CONTENT_TYPE) {
            continue;
        }
        seen.insert(header.name.to_ascii_lowercase());
        headers.push(header.clone());
    }

    for header in &origin.response_headers {
        if header.is(ETAG) {
            headers.push(ResponseHeader::new(header.name.clone(), weaken(&header.value)));
        } else if header.is(CONTENT_TYPE) || !seen.contains(&header.name.to_ascii_lowercase()) {
            headers.push(header.clone());
        }
    }

    headers
}
