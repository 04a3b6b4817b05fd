//! Table of contents generation from rendered HTML

use lazy_static::lazy_static;
use regex::Regex;

use super::html::strip_html;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?s)<h([1-6])([^>]*)>(.*?)</h[1-6]>").unwrap();
    static ref ID_ATTR: Regex = Regex::new(r#"id="([^"]*)""#).unwrap();
}

/// Build a nested `<ol class="toc">` from the headings in `content`
///
/// Headings deeper than `max_depth` are skipped. Anchors reuse the heading's
/// `id` attribute when present.
pub fn toc(content: &str, max_depth: usize) -> String {
    let mut html = r#"<ol class="toc">"#.to_string();
    let mut current_level = 0;
    let mut base_level = None;

    for cap in HEADING.captures_iter(content) {
        let level: usize = cap[1].parse().unwrap_or(1);
        if level > max_depth {
            continue;
        }
        // Nest relative to the shallowest heading seen so a post that starts
        // at h2 does not open an empty outer list
        let base = *base_level.get_or_insert(level);
        let depth = level.saturating_sub(base) + 1;

        let text = strip_html(&cap[3]);
        let id = ID_ATTR
            .captures(&cap[2])
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| slug::slugify(&text));

        while current_level < depth {
            html.push_str("<ol>");
            current_level += 1;
        }
        while current_level > depth {
            html.push_str("</ol>");
            current_level -= 1;
        }

        html.push_str(&format!(
            "<li class=\"toc-item toc-level-{}\"><a class=\"toc-link\" href=\"#{}\"><span class=\"toc-text\">{}</span></a></li>",
            level,
            id,
            text.trim()
        ));
    }

    while current_level > 0 {
        html.push_str("</ol>");
        current_level -= 1;
    }

    html.push_str("</ol>");
    html
}
