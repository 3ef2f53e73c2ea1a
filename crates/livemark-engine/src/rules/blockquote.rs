use super::{RuleContext, RuleError, SyntaxRule, lines_with_offsets};
use crate::decor::{Decoration, WidgetSpec};
use crate::engine::EditorMode;
use crate::styles;

/// Blockquote marker runs: one or more leading `>` per line, optionally
/// separated by spaces, the repeat count giving the nesting depth.
pub struct Blockquote;

impl Blockquote {
    pub const PREFIX: char = '>';

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Handles `> text`, `>> nested`, and `> > spaced nested` forms.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            while i < b.len() && b[i] == b' ' {
                i += 1;
            }
            if i < b.len() && b[i] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                i += 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                break;
            }
        }
        (depth, i)
    }
}

impl SyntaxRule for Blockquote {
    fn name(&self) -> &'static str {
        "blockquote"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        for (line_start, line) in lines_with_offsets(ctx.text()) {
            let (depth, prefix_len) = Self::strip_prefixes(line);
            if depth == 0 {
                continue;
            }
            let from = ctx.abs(line_start);
            let to = ctx.abs(line_start + prefix_len);

            match ctx.mode() {
                EditorMode::Render => {
                    ctx.emit(Decoration::replace(
                        from,
                        to,
                        WidgetSpec::BlockquoteBar { level: depth },
                    ))?;
                }
                EditorMode::Edit => {
                    let line_end = ctx.abs(line_start + line.len());
                    if ctx.cursors().touches(from, line_end) {
                        // The line being edited keeps its raw markers.
                        ctx.emit(Decoration::mark(from, to, styles::MARKER_ACTIVE).inclusive())?;
                    } else {
                        for (i, b) in line[..prefix_len].bytes().enumerate() {
                            if b == Self::PREFIX as u8 {
                                ctx.emit(Decoration::replace(
                                    ctx.abs(line_start + i),
                                    ctx.abs(line_start + i + 1),
                                    WidgetSpec::BlockquoteBar { level: 1 },
                                ))?;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EditorMode;
    use crate::rope::span::Span;
    use crate::rules::testutil::{run_rule, spans_with_class};

    #[test]
    fn strip_no_quote() {
        assert_eq!(Blockquote::strip_prefixes("hello"), (0, 0));
    }

    #[test]
    fn strip_single_quote() {
        assert_eq!(Blockquote::strip_prefixes("> hello"), (1, 2));
    }

    #[test]
    fn strip_spaced_nested_quote() {
        assert_eq!(Blockquote::strip_prefixes("> > hello"), (2, 4));
    }

    #[test]
    fn strip_tight_nested_quote() {
        assert_eq!(Blockquote::strip_prefixes(">> hello"), (2, 3));
    }

    #[test]
    fn render_mode_replaces_marker_run_with_leveled_bar() {
        let decos = run_rule(&Blockquote, "> > deep", None, EditorMode::Render);
        assert_eq!(decos.len(), 1);
        assert_eq!(decos[0].span, Span::new(0, 4));
        assert!(matches!(
            decos[0].kind,
            crate::decor::DecorationKind::Replace(WidgetSpec::BlockquoteBar { level: 2 })
        ));
    }

    #[test]
    fn edit_mode_bars_only_cursor_free_lines() {
        let decos = run_rule(&Blockquote, "> one\n> two", Some(2), EditorMode::Edit);
        assert_eq!(
            spans_with_class(&decos, styles::MARKER_ACTIVE),
            vec![Span::new(0, 2)]
        );
        let bars: Vec<Span> = decos
            .iter()
            .filter(|d| d.is_replace())
            .map(|d| d.span)
            .collect();
        assert_eq!(bars, vec![Span::new(6, 7)]);
    }

    #[test]
    fn edit_mode_replaces_each_marker_separately() {
        let decos = run_rule(&Blockquote, "> > deep", None, EditorMode::Edit);
        let bars: Vec<Span> = decos
            .iter()
            .filter(|d| d.is_replace())
            .map(|d| d.span)
            .collect();
        assert_eq!(bars, vec![Span::new(0, 1), Span::new(2, 3)]);
    }
}
