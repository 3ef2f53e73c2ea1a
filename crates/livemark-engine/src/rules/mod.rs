//! Syntax-detection rules.
//!
//! Each rule is an independent detector: it scans the text slice with its
//! own pattern and emits decoration requests through the context's sink.
//! Rules never see each other's output and run in a fixed order; a rule
//! that fails contributes nothing for that pass and the rest still run.

pub mod blockquote;
pub mod bold;
pub mod code_fence;
pub mod escape;
pub mod heading;
pub mod highlight;
pub mod horizontal_rule;
pub mod inline_code;
pub mod italic;
pub mod list;
pub mod strikethrough;

use thiserror::Error;

use crate::decor::{Decoration, DecorationSink};
use crate::engine::{EditorMode, EngineOptions};
use crate::rope::span::Span;
use crate::selection::CursorSet;
use crate::styles;

pub use escape::is_escaped;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("decoration span {start}..{end} exceeds text length {len}")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("decoration span {start}..{end} is inverted")]
    InvertedSpan { start: usize, end: usize },
}

/// Everything a rule sees for one pass over one text slice.
pub struct RuleContext<'a> {
    text: &'a str,
    base: usize,
    cursors: &'a CursorSet,
    mode: EditorMode,
    options: &'a EngineOptions,
    out: &'a mut dyn DecorationSink,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        text: &'a str,
        base: usize,
        cursors: &'a CursorSet,
        mode: EditorMode,
        options: &'a EngineOptions,
        out: &'a mut dyn DecorationSink,
    ) -> Self {
        Self {
            text,
            base,
            cursors,
            mode,
            options,
            out,
        }
    }

    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the slice within the full document.
    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    #[must_use]
    pub fn cursors(&self) -> &CursorSet {
        self.cursors
    }

    #[must_use]
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        self.options
    }

    /// Converts a slice-local offset to a document offset.
    #[must_use]
    pub fn abs(&self, local: usize) -> usize {
        self.base + local
    }

    /// Validates a request's span against the slice bounds, then forwards
    /// it to the sink. Out-of-range spans are rule bugs surfaced as errors,
    /// never panics.
    pub fn emit(&mut self, deco: Decoration) -> Result<(), RuleError> {
        let sp = deco.span;
        if sp.start > sp.end {
            return Err(RuleError::InvertedSpan {
                start: sp.start,
                end: sp.end,
            });
        }
        let limit = self.base + self.text.len();
        if sp.end > limit {
            return Err(RuleError::SpanOutOfBounds {
                start: sp.start,
                end: sp.end,
                len: limit,
            });
        }
        self.out.add(deco);
        Ok(())
    }
}

/// Sub-spans of one pattern match, slice-local.
///
/// Markers and content are contiguous: `open.end == content.start` and
/// `content.end == close.start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxMatch {
    pub full: Span,
    pub open: Span,
    pub content: Span,
    pub close: Span,
}

impl SyntaxMatch {
    /// Builds the sub-spans for a match delimited by markers of equal
    /// length on both sides.
    #[must_use]
    pub fn symmetric(start: usize, end: usize, marker_len: usize) -> Self {
        Self {
            full: Span::new(start, end),
            open: Span::new(start, start + marker_len),
            content: Span::new(start + marker_len, end - marker_len),
            close: Span::new(end - marker_len, end),
        }
    }

    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.open.end == self.content.start && self.content.end == self.close.start
    }
}

pub trait SyntaxRule {
    fn name(&self) -> &'static str;
    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError>;
}

/// The fixed rule set, in processing order.
pub fn default_rules() -> Vec<Box<dyn SyntaxRule>> {
    vec![
        Box::new(heading::Heading),
        Box::new(bold::Bold),
        Box::new(italic::Italic),
        Box::new(strikethrough::Strikethrough),
        Box::new(highlight::Highlight),
        Box::new(inline_code::InlineCode),
        Box::new(list::List),
        Box::new(blockquote::Blockquote),
        Box::new(horizontal_rule::HorizontalRule),
        Box::new(code_fence::CodeFence),
    ]
}

/// Runs every rule over the slice, collecting all requests.
///
/// Each rule writes into a private scratch sink; on failure the scratch is
/// discarded and the failure logged, so one mis-detecting rule cannot blank
/// the rest of the pass.
pub fn run_rules(
    text: &str,
    base: usize,
    cursors: &CursorSet,
    mode: EditorMode,
    options: &EngineOptions,
) -> Vec<Decoration> {
    let mut out = Vec::new();
    for rule in default_rules() {
        let mut scratch: Vec<Decoration> = Vec::new();
        let result = {
            let mut ctx = RuleContext::new(text, base, cursors, mode, options, &mut scratch);
            rule.process(&mut ctx)
        };
        match result {
            Ok(()) => out.append(&mut scratch),
            Err(err) => {
                tracing::warn!(rule = rule.name(), error = %err, "syntax rule skipped for this pass");
            }
        }
    }
    out
}

/// Iterates lines of `text` as `(byte_offset, line)` pairs, line endings
/// stripped from the yielded slice but accounted for in offsets.
pub(crate) fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let mut offset = 0usize;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        (start, raw.trim_end_matches(['\r', '\n']))
    })
}

/// Emits the standard mark triplet for an inline construct: content mark
/// plus open/close marker marks whose class follows cursor proximity over
/// the full matched span.
pub(crate) fn emit_inline(
    ctx: &mut RuleContext<'_>,
    m: &SyntaxMatch,
    content_class: &'static str,
    slack: usize,
) -> Result<(), RuleError> {
    debug_assert!(m.is_contiguous());
    let near = ctx
        .cursors()
        .is_near(ctx.abs(m.full.start), ctx.abs(m.full.end), slack);
    let marker_class = if near {
        styles::MARKER_ACTIVE
    } else {
        styles::MARKER_DIM
    };
    let marker = |ctx: &RuleContext<'_>, sp: Span| {
        let d = Decoration::mark(ctx.abs(sp.start), ctx.abs(sp.end), marker_class);
        if near { d.inclusive() } else { d }
    };
    let open = marker(ctx, m.open);
    let close = marker(ctx, m.close);
    ctx.emit(open)?;
    ctx.emit(Decoration::mark(
        ctx.abs(m.content.start),
        ctx.abs(m.content.end),
        content_class,
    ))?;
    ctx.emit(close)?;
    Ok(())
}

/// Scans for a symmetric inline construct (equal-length open and close
/// markers) and emits the mark triplet for every accepted match.
///
/// A match is skipped when either marker is escaped, when the content span
/// is empty, or when `guard` rejects it.
pub(crate) fn scan_symmetric(
    ctx: &mut RuleContext<'_>,
    re: &regex::Regex,
    marker_len: usize,
    content_class: &'static str,
    guard: impl Fn(&str, usize, usize) -> bool,
) -> Result<(), RuleError> {
    let text = ctx.text();
    let mut accepted = Vec::new();
    for found in re.find_iter(text) {
        let (start, end) = (found.start(), found.end());
        if is_escaped(text, start) || is_escaped(text, end - marker_len) {
            continue;
        }
        if end - start <= marker_len * 2 {
            // two bare markers with no styled content
            continue;
        }
        if !guard(text, start, end) {
            continue;
        }
        accepted.push(SyntaxMatch::symmetric(start, end, marker_len));
    }
    for m in accepted {
        emit_inline(ctx, &m, content_class, 0)?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_match_sub_spans() {
        // "**bold**"
        let m = SyntaxMatch::symmetric(0, 8, 2);
        assert_eq!(m.open, Span::new(0, 2));
        assert_eq!(m.content, Span::new(2, 6));
        assert_eq!(m.close, Span::new(6, 8));
        assert!(m.is_contiguous());
    }

    #[test]
    fn lines_with_offsets_tracks_positions() {
        let lines: Vec<(usize, &str)> = lines_with_offsets("ab\ncd\r\nef").collect();
        assert_eq!(lines, vec![(0, "ab"), (3, "cd"), (7, "ef")]);
    }

    #[test]
    fn lines_with_offsets_empty_text() {
        assert_eq!(lines_with_offsets("").count(), 0);
    }

    #[test]
    fn emit_rejects_out_of_bounds_span() {
        let cursors = CursorSet::default();
        let options = EngineOptions::default();
        let mut scratch: Vec<Decoration> = Vec::new();
        let mut ctx = RuleContext::new(
            "short",
            0,
            &cursors,
            EditorMode::Edit,
            &options,
            &mut scratch,
        );
        let err = ctx.emit(Decoration::mark(0, 99, styles::STRONG));
        assert!(matches!(err, Err(RuleError::SpanOutOfBounds { .. })));
    }
}
