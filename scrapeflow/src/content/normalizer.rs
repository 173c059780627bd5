//! Reduces fetched markup to clean plain text.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

fn body_tag_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)<body[\s>/]").ok())
        .as_ref()
}

fn body_selector() -> Option<&'static Selector> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("body").ok()).as_ref()
}

fn stripped_selector() -> Option<&'static Selector> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    SELECTOR
        .get_or_init(|| Selector::parse("script, style").ok())
        .as_ref()
}

/// Returns the serialized contents of the document's `<body>`.
///
/// HTML parsers synthesize a body for any input, so a body only counts as
/// present when the markup actually opens one. Without it the result is empty.
#[must_use]
pub fn extract_body(markup: &str) -> String {
    let has_body = body_tag_pattern().is_some_and(|re| re.is_match(markup));
    if !has_body {
        return String::new();
    }

    let document = Html::parse_document(markup);
    body_selector()
        .and_then(|selector| document.select(selector).next())
        .map(|body| body.inner_html())
        .unwrap_or_default()
}

/// Strips scripts and styles and collapses the fragment to trimmed,
/// non-blank lines of text in document order.
#[must_use]
pub fn clean_text(fragment: &str) -> String {
    let mut document = Html::parse_fragment(fragment);

    if let Some(selector) = stripped_selector() {
        let doomed: Vec<_> = document.select(selector).map(|element| element.id()).collect();
        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    let raw = document.root_element().text().collect::<Vec<_>>().join("\n");
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs [`extract_body`] followed by [`clean_text`].
#[must_use]
pub fn normalize(markup: &str) -> String {
    clean_text(&extract_body(markup))
}
