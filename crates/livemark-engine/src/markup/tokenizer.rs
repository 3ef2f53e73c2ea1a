use crate::decor::Decoration;
use crate::styles;

use super::region::is_void_tag;

/// Readability tokenizer for edit-mode regions.
///
/// Emits marks for bracket characters (colored by a cycling nesting depth),
/// tag names, attribute names, and attribute values. Tracks only a depth
/// counter; it never balance-checks, since its sole purpose is coloring raw
/// source while editing.
pub fn tokenize(base: usize, text: &str) -> Vec<Decoration> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let closing = bytes.get(i + 1) == Some(&b'/');
        let name_start = if closing { i + 2 } else { i + 1 };
        let name_end = scan_name(bytes, name_start);
        if name_end == name_start {
            i += 1;
            continue;
        }

        let color = if closing {
            depth = depth.saturating_sub(1);
            depth
        } else {
            depth
        };
        let bracket = bracket_class(color);

        out.push(Decoration::mark(base + i, base + name_start, bracket));
        out.push(Decoration::mark(
            base + name_start,
            base + name_end,
            styles::HTML_TAG,
        ));

        let name = &text[name_start..name_end];
        let (end, self_closed) = scan_attributes(bytes, name_end, base, &mut out);
        // closing bracket, `/>` included when present
        let bracket_start = if self_closed { end - 2 } else { end - 1 };
        if end > i {
            out.push(Decoration::mark(base + bracket_start, base + end, bracket));
        }
        if !closing && !self_closed && !is_void_tag(name) {
            depth += 1;
        }
        i = end.max(i + 1);
    }

    out
}

fn bracket_class(depth: usize) -> &'static str {
    styles::HTML_BRACKET[depth % styles::HTML_BRACKET.len()]
}

fn scan_name(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    if i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
            i += 1;
        }
        i
    } else {
        start
    }
}

/// Scans attributes up to and including the closing `>`.
///
/// Returns the offset just past `>` (or the text end when the tag is left
/// unterminated) and whether a trailing slash marked the tag self-closing.
fn scan_attributes(bytes: &[u8], start: usize, base: usize, out: &mut Vec<Decoration>) -> (usize, bool) {
    let mut i = start;
    let mut self_closed = false;

    while i < bytes.len() {
        match bytes[i] {
            b'>' => return (i + 1, self_closed),
            b'/' => {
                self_closed = bytes.get(i + 1) == Some(&b'>');
                i += 1;
            }
            b'"' | b'\'' => {
                let quote = bytes[i];
                let vstart = i;
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                i = (i + 1).min(bytes.len());
                out.push(Decoration::mark(base + vstart, base + i, styles::HTML_VALUE));
                self_closed = false;
            }
            b'=' => {
                i += 1;
                // unquoted value
                let vstart = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'"' && bytes[i] != b'\'' {
                    i += 1;
                }
                if i > vstart {
                    out.push(Decoration::mark(base + vstart, base + i, styles::HTML_VALUE));
                    self_closed = bytes[i - 1] == b'/' && bytes.get(i) == Some(&b'>');
                }
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let astart = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && bytes[i] != b'='
                    && bytes[i] != b'>'
                    && bytes[i] != b'/'
                {
                    i += 1;
                }
                if i > astart {
                    out.push(Decoration::mark(base + astart, base + i, styles::HTML_ATTR));
                    self_closed = false;
                } else {
                    i += 1;
                }
            }
        }
    }
    (bytes.len(), self_closed)
}
