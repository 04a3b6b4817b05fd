//! Plain-text helpers: excerpts and slugs

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MARKDOWN_MARKS: Regex = Regex::new(r"[#*_~`]").unwrap();
    static ref TRAILING_PARTIAL_WORD: Regex = Regex::new(r"\s+\S*$").unwrap();
}

/// Default excerpt length in characters
pub const EXCERPT_LENGTH: usize = 160;

/// Build a plain-text excerpt from markdown
///
/// Markdown emphasis and heading marks are dropped and newlines become
/// spaces. Longer text is cut at `max_length` characters, the partial last
/// word removed, and `...` appended.
pub fn extract_excerpt(content: &str, max_length: usize) -> String {
    let text = MARKDOWN_MARKS.replace_all(content, "").replace('\n', " ");
    let text = text.replace('\r', "");
    if text.chars().count() <= max_length {
        return text;
    }

    let cut: String = text.chars().take(max_length).collect();
    let cut = TRAILING_PARTIAL_WORD.replace(&cut, "");
    format!("{}...", cut)
}

/// Make a URL-safe slug (`"Diné Values 101"` -> `"dine-values-101"`)
pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}
