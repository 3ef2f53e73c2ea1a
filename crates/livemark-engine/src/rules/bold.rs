use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, scan_symmetric};
use crate::styles;

/// Bold runs: `**text**` or `__text__`.
///
/// Both patterns use doubled markers, so the single-marker italic variants
/// cannot collide with them inside one match.
pub struct Bold;

impl Bold {
    pub const MARKER_LEN: usize = 2;

    fn asterisks() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"\*\*([^*\n]+)\*\*").expect("invalid bold pattern"))
    }

    fn underscores() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"__([^_\n]+)__").expect("invalid bold pattern"))
    }
}

impl SyntaxRule for Bold {
    fn name(&self) -> &'static str {
        "bold"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        scan_symmetric(
            ctx,
            Self::asterisks(),
            Self::MARKER_LEN,
            styles::STRONG,
            |_, _, _| true,
        )?;
        scan_symmetric(
            ctx,
            Self::underscores(),
            Self::MARKER_LEN,
            styles::STRONG,
            |_, _, _| true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EditorMode;
    use crate::rope::span::Span;
    use crate::rules::testutil::{run_rule, spans_with_class};

    #[test]
    fn detects_asterisk_bold() {
        let decos = run_rule(&Bold, "a **bold** b", None, EditorMode::Edit);
        assert_eq!(
            spans_with_class(&decos, styles::STRONG),
            vec![Span::new(4, 8)]
        );
        assert_eq!(
            spans_with_class(&decos, styles::MARKER_DIM),
            vec![Span::new(2, 4), Span::new(8, 10)]
        );
    }

    #[test]
    fn detects_underscore_bold() {
        let decos = run_rule(&Bold, "__bold__", None, EditorMode::Edit);
        assert_eq!(
            spans_with_class(&decos, styles::STRONG),
            vec![Span::new(2, 6)]
        );
    }

    #[test]
    fn cursor_inside_makes_markers_active() {
        let decos = run_rule(&Bold, "**bold**", Some(4), EditorMode::Edit);
        assert_eq!(spans_with_class(&decos, styles::MARKER_ACTIVE).len(), 2);
        assert!(spans_with_class(&decos, styles::MARKER_DIM).is_empty());
    }

    #[test]
    fn escaped_markers_do_not_match() {
        let decos = run_rule(&Bold, r"\*\*not bold\*\*", None, EditorMode::Edit);
        assert!(decos.is_empty());
    }

    #[test]
    fn bare_marker_pair_is_skipped() {
        let decos = run_rule(&Bold, "****", None, EditorMode::Edit);
        assert!(decos.is_empty());
    }
}
