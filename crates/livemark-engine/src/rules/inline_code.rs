use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, scan_symmetric};
use crate::styles;

/// Inline code spans: `` `code` ``.
pub struct InlineCode;

impl InlineCode {
    pub const MARKER_LEN: usize = 1;

    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"`([^`\n]+)`").expect("invalid inline code pattern"))
    }
}

impl SyntaxRule for InlineCode {
    fn name(&self) -> &'static str {
        "inline-code"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        scan_symmetric(
            ctx,
            Self::pattern(),
            Self::MARKER_LEN,
            styles::INLINE_CODE,
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
    fn detects_code_span() {
        let decos = run_rule(&InlineCode, "see `let x` here", None, EditorMode::Edit);
        assert_eq!(
            spans_with_class(&decos, styles::INLINE_CODE),
            vec![Span::new(5, 10)]
        );
    }

    #[test]
    fn unclosed_backtick_is_plain_text() {
        let decos = run_rule(&InlineCode, "`unclosed", None, EditorMode::Edit);
        assert!(decos.is_empty());
    }

    #[test]
    fn cursor_at_marker_boundary_is_active() {
        let decos = run_rule(&InlineCode, "`x`", Some(0), EditorMode::Edit);
        assert_eq!(spans_with_class(&decos, styles::MARKER_ACTIVE).len(), 2);
    }
}
