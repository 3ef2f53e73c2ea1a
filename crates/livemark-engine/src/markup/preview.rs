use std::sync::OnceLock;

use regex::Regex;

fn strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("invalid strip pattern"))
}

/// Derives a plain-text preview label from a raw-markup fragment.
///
/// Tags and comments are stripped, entities decoded, and whitespace
/// collapsed. Used by hosts that cannot render the markup itself.
#[must_use]
pub fn preview_text(html: &str) -> String {
    let stripped = strip_pattern().replace_all(html, " ");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
