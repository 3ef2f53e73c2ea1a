use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, lines_with_offsets};
use crate::decor::{Decoration, WidgetSpec};
use crate::styles;

/// Thematic breaks: a line of three or more `-`, `*`, or `_`, optionally
/// space-separated, with nothing else on the line.
pub struct HorizontalRule;

impl HorizontalRule {
    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"^[ \t]{0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$")
                .expect("invalid thematic break pattern")
        })
    }
}

impl SyntaxRule for HorizontalRule {
    fn name(&self) -> &'static str {
        "horizontal-rule"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        for (line_start, line) in lines_with_offsets(ctx.text()) {
            if line.is_empty() || !Self::pattern().is_match(line) {
                continue;
            }
            let from = ctx.abs(line_start);
            let to = ctx.abs(line_start + line.len());
            if ctx.cursors().touches(from, to) {
                ctx.emit(Decoration::mark(from, to, styles::MARKER_ACTIVE).inclusive())?;
            } else {
                ctx.emit(Decoration::replace(from, to, WidgetSpec::HorizontalRule))?;
            }
        }
        Ok(())
    }
}
