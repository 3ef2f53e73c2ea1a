use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, scan_symmetric};
use crate::styles;

/// Highlight runs: `==text==`.
pub struct Highlight;

impl Highlight {
    pub const MARKER_LEN: usize = 2;

    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"==([^=\n]+)==").expect("invalid highlight pattern"))
    }
}

impl SyntaxRule for Highlight {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        scan_symmetric(
            ctx,
            Self::pattern(),
            Self::MARKER_LEN,
            styles::HIGHLIGHT,
            |_, _, _| true,
        )
    }
}
