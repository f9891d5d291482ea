//! Plain-text previews of rich-text note bodies.

use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static HTML_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(nbsp|amp|lt|gt|quot|#39);").expect("valid entity regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Strips markup from a note body and keeps the first 100 characters.
///
/// Returns `None` when nothing readable remains.
pub fn derive_plain_preview(content: &str) -> Option<String> {
    let without_tags = HTML_TAG_RE.replace_all(content, " ");
    let decoded = HTML_ENTITY_RE.replace_all(&without_tags, |caps: &regex::Captures<'_>| {
        match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "#39" => "'",
            _ => " ",
        }
        .to_string()
    });
    let normalized = WHITESPACE_RE.replace_all(&decoded, " ");
    let trimmed = normalized.trim();
    (!trimmed.is_empty()).then(|| trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
}
