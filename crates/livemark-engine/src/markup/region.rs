use std::sync::OnceLock;

use regex::Regex;

use crate::rope::span::Span;

/// Tag names that are self-closing by definition.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[must_use]
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// One detected raw-markup fragment.
///
/// Lives only for the duration of a single recomputation pass. Regions are
/// either disjoint or properly nested, never partially overlapping: a
/// closer only ever resolves the innermost unclosed opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMarkupRegion {
    /// Outer span, opening `<` through closing `>`.
    pub span: Span,
    /// Opening tag's name as written.
    pub tag_name: String,
    pub is_self_closing: bool,
    /// True when the outer span crosses a line break.
    pub is_multiline: bool,
    /// End of the opening tag. Equals `span.end` for self-closing tags.
    pub open_tag_end: usize,
    /// Start of the closing tag. Equals `span.end` for self-closing tags.
    pub close_tag_start: usize,
    /// Verbatim text of the outer span.
    pub content: String,
}

#[derive(Debug)]
struct OpenTag {
    name: String,
    start: usize,
    open_tag_end: usize,
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:"[^"]*"|'[^']*'|[^>"'])*)>"#)
            .expect("invalid tag pattern")
    })
}

fn comment_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment pattern"))
}

/// Scans the full text for raw-markup regions.
///
/// Comment spans are located first so tags inside them are not tracked.
/// Unmatched closing tags are ignored; unclosed opening tags produce no
/// region. Output order follows emission (close order), not position; the
/// compositor sorts.
pub fn detect(text: &str) -> Vec<RawMarkupRegion> {
    let comments: Vec<(usize, usize)> = comment_pattern()
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();
    let in_comment = |pos: usize| comments.iter().any(|&(s, e)| pos >= s && pos < e);

    let mut stack: Vec<OpenTag> = Vec::new();
    let mut out = Vec::new();

    for caps in tag_pattern().captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        if in_comment(whole.start()) {
            continue;
        }
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps.get(2).map_or("", |m| m.as_str());
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let explicit_self_close = attrs.trim_end().ends_with('/');

        if closing {
            // A closer resolves only the innermost unclosed tag, and only
            // when the names agree; otherwise it is dropped and the
            // innermost opener left dangling.
            let matches_top = stack
                .last()
                .is_some_and(|top| top.name.eq_ignore_ascii_case(name));
            if !matches_top {
                continue;
            }
            let open = match stack.pop() {
                Some(o) => o,
                None => continue,
            };
            let span = Span::new(open.start, whole.end());
            let content = text[span.start..span.end].to_string();
            out.push(RawMarkupRegion {
                span,
                tag_name: open.name,
                is_self_closing: false,
                is_multiline: content.contains('\n'),
                open_tag_end: open.open_tag_end,
                close_tag_start: whole.start(),
                content,
            });
        } else if explicit_self_close || is_void_tag(name) {
            let span = Span::new(whole.start(), whole.end());
            out.push(RawMarkupRegion {
                span,
                tag_name: name.to_string(),
                is_self_closing: true,
                is_multiline: false,
                open_tag_end: span.end,
                close_tag_start: span.end,
                content: text[span.start..span.end].to_string(),
            });
        } else {
            stack.push(OpenTag {
                name: name.to_string(),
                start: whole.start(),
                open_tag_end: whole.end(),
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn balanced_pair_yields_one_region() {
        let regions = detect("a <div>inner</div> b");
        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        assert_eq!(r.span, Span::new(2, 18));
        assert_eq!(r.tag_name, "div");
        assert!(!r.is_self_closing);
        assert!(!r.is_multiline);
        assert_eq!(r.open_tag_end, 7);
        assert_eq!(r.close_tag_start, 12);
        assert_eq!(r.content, "<div>inner</div>");
    }

    #[test]
    fn nested_tags_produce_properly_nested_regions() {
        let regions = detect("<div><span>x</span></div>");
        assert_eq!(regions.len(), 2);
        // inner closes first
        assert_eq!(regions[0].tag_name, "span");
        assert_eq!(regions[1].tag_name, "div");
        assert!(regions[1].span.properly_contains(regions[0].span));
    }

    #[test]
    fn unbalanced_markup_yields_no_regions() {
        assert!(detect("<div><span></div>").is_empty());
    }

    #[test]
    fn stray_closer_is_ignored() {
        assert!(detect("text </div> more").is_empty());
    }

    #[test]
    fn unclosed_opener_yields_no_region() {
        assert!(detect("<div> dangling").is_empty());
    }

    #[test]
    fn void_tag_is_self_closing() {
        let regions = detect("line one<br>line two");
        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        assert!(r.is_self_closing);
        assert_eq!(r.span, Span::new(8, 12));
        assert_eq!(r.open_tag_end, r.span.end);
        assert_eq!(r.close_tag_start, r.span.end);
    }

    #[test]
    fn explicit_self_close_of_non_void_element() {
        let regions = detect("<widget data-x=1 />");
        assert_eq!(regions.len(), 1);
        assert!(regions[0].is_self_closing);
        assert_eq!(regions[0].tag_name, "widget");
    }

    #[test]
    fn closing_name_matches_case_insensitively() {
        let regions = detect("<DIV>x</div>");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].tag_name, "DIV");
    }

    #[test]
    fn tags_inside_comments_are_not_tracked() {
        assert!(detect("<!-- <div> --> no close").is_empty());
        // and the comment does not break a real pair around it
        let regions = detect("<p><!-- <div> --></p>");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].tag_name, "p");
    }

    #[test]
    fn multiline_region_is_flagged() {
        let regions = detect("<pre>\nline\n</pre>");
        assert_eq!(regions.len(), 1);
        assert!(regions[0].is_multiline);
    }

    #[test]
    fn quoted_gt_inside_attribute_does_not_end_the_tag() {
        let regions = detect(r#"<a title="a > b">x</a>"#);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].tag_name, "a");
        assert_eq!(regions[0].open_tag_end, 17);
    }
}
