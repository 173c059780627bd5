//! Character-encoding resolution for fetched pages.

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use std::sync::OnceLock;

/// How many leading bytes are inspected for a `<meta>` charset declaration.
const SNIFF_LIMIT: usize = 1024;

fn meta_charset_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).ok()
        })
        .as_ref()
}

/// Looks for a charset declared in the document head.
#[must_use]
pub fn sniff_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(SNIFF_LIMIT)];
    let captures = meta_charset_pattern()?.captures(head)?;
    let label = captures.get(1)?.as_bytes();
    Encoding::for_label(label)
}

/// Picks the encoding for a body: declared charset, then sniffed, then UTF-8.
#[must_use]
pub fn resolve_encoding(body: &[u8], declared: Option<&str>) -> &'static Encoding {
    declared
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .or_else(|| sniff_charset(body))
        .unwrap_or(UTF_8)
}

/// Decodes a page body to text, returning the encoding actually applied.
///
/// A byte-order mark overrides any declared or sniffed charset. Malformed
/// sequences are replaced rather than rejected.
#[must_use]
pub fn decode_body(body: &[u8], declared: Option<&str>) -> (String, &'static Encoding) {
    let encoding = resolve_encoding(body, declared);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!(encoding = used.name(), "Body contained malformed sequences");
    }
    (text.into_owned(), used)
}
