use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    /// The line text as a string, newline included.
    pub text: String,
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` to preserve newline characters, which is important for
/// accurate span tracking when mapping decorations back onto lines.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        let len = line.len();
        offset += len;
        LineRef {
            span: Span::new(start, offset),
            text: line.into_owned(),
        }
    })
}

/// Returns the span of the line containing `pos`, newline excluded.
///
/// `pos` past the end of the rope is clamped to the last line.
pub fn line_span_at(rope: &Rope, pos: usize) -> Span {
    let mut last = Span::new(0, 0);
    for lr in lines_with_spans(rope) {
        let content_end = lr.span.start + lr.text.trim_end_matches(['\r', '\n']).len();
        last = Span::new(lr.span.start, content_end);
        if pos < lr.span.end {
            return last;
        }
    }
    last
}
