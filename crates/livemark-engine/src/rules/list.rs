use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, lines_with_offsets};
use crate::decor::{Decoration, WidgetSpec};
use crate::styles;

/// List item markers.
///
/// Ordered markers (`1.`) keep a dim/active text class so numbering stays
/// visible; unordered markers (`-`, `+`, `*`) are replaced by a bullet
/// widget on lines away from the cursor.
pub struct List;

impl List {
    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"^([ \t]*)(?:(\d+\.)|([-+*]))[ \t]+").expect("invalid list pattern")
        })
    }
}

impl SyntaxRule for List {
    fn name(&self) -> &'static str {
        "list"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        for (line_start, line) in lines_with_offsets(ctx.text()) {
            let Some(caps) = Self::pattern().captures(line) else {
                continue;
            };
            let line_end = line_start + line.len();
            let near = ctx
                .cursors()
                .touches(ctx.abs(line_start), ctx.abs(line_end));

            if let Some(number) = caps.get(2) {
                let class = if near {
                    styles::MARKER_ACTIVE
                } else {
                    styles::MARKER_DIM
                };
                ctx.emit(Decoration::mark(
                    ctx.abs(line_start + number.start()),
                    ctx.abs(line_start + number.end()),
                    class,
                ))?;
            } else if let Some(bullet) = caps.get(3) {
                let from = ctx.abs(line_start + bullet.start());
                let to = ctx.abs(line_start + bullet.end());
                if near {
                    ctx.emit(Decoration::mark(from, to, styles::MARKER_ACTIVE).inclusive())?;
                } else {
                    ctx.emit(Decoration::replace(from, to, WidgetSpec::ListBullet))?;
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
    fn unordered_markers_become_widgets_away_from_cursor() {
        let decos = run_rule(&List, "- item one\n- item two", None, EditorMode::Edit);
        let widgets: Vec<Span> = decos
            .iter()
            .filter(|d| d.is_replace())
            .map(|d| d.span)
            .collect();
        assert_eq!(widgets, vec![Span::new(0, 1), Span::new(11, 12)]);
    }

    #[test]
    fn cursor_line_reverts_to_raw_marker() {
        let decos = run_rule(&List, "- item one\n- item two", Some(3), EditorMode::Edit);
        assert_eq!(
            spans_with_class(&decos, styles::MARKER_ACTIVE),
            vec![Span::new(0, 1)]
        );
        let widgets: Vec<Span> = decos
            .iter()
            .filter(|d| d.is_replace())
            .map(|d| d.span)
            .collect();
        assert_eq!(widgets, vec![Span::new(11, 12)]);
    }

    #[test]
    fn ordered_markers_are_never_replaced() {
        let decos = run_rule(&List, "1. first\n2. second", None, EditorMode::Edit);
        assert!(decos.iter().all(|d| !d.is_replace()));
        assert_eq!(
            spans_with_class(&decos, styles::MARKER_DIM),
            vec![Span::new(0, 2), Span::new(9, 11)]
        );
    }

    #[test]
    fn indented_items_are_detected() {
        let decos = run_rule(&List, "  - nested", None, EditorMode::Edit);
        let widgets: Vec<Span> = decos
            .iter()
            .filter(|d| d.is_replace())
            .map(|d| d.span)
            .collect();
        assert_eq!(widgets, vec![Span::new(2, 3)]);
    }

    #[test]
    fn marker_without_trailing_space_is_plain_text() {
        let decos = run_rule(&List, "-item", None, EditorMode::Edit);
        assert!(decos.is_empty());
    }
}
