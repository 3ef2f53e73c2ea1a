use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, scan_symmetric};
use crate::styles;

/// Strikethrough runs: `~~text~~`.
pub struct Strikethrough;

impl Strikethrough {
    pub const MARKER_LEN: usize = 2;

    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"~~([^~\n]+)~~").expect("invalid strikethrough pattern"))
    }
}

impl SyntaxRule for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        scan_symmetric(
            ctx,
            Self::pattern(),
            Self::MARKER_LEN,
            styles::STRIKE,
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
    fn detects_strikethrough() {
        let decos = run_rule(&Strikethrough, "~~gone~~", None, EditorMode::Edit);
        assert_eq!(
            spans_with_class(&decos, styles::STRIKE),
            vec![Span::new(2, 6)]
        );
        assert_eq!(spans_with_class(&decos, styles::MARKER_DIM).len(), 2);
    }

    #[test]
    fn single_tilde_is_plain_text() {
        let decos = run_rule(&Strikethrough, "~plain~", None, EditorMode::Edit);
        assert!(decos.is_empty());
    }
}
