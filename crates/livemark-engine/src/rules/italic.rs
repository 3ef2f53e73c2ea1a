use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, scan_symmetric};
use crate::styles;

/// Italic runs: `*text*` or `_text_`.
///
/// Matched separately from bold and guarded against adjacent marker
/// characters so a doubled marker is never half-consumed as italic.
pub struct Italic;

impl Italic {
    pub const MARKER_LEN: usize = 1;

    fn asterisks() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"\*([^*\n]+)\*").expect("invalid italic pattern"))
    }

    fn underscores() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"_([^_\n]+)_").expect("invalid italic pattern"))
    }

    fn not_adjacent_to(text: &str, start: usize, end: usize, marker: char) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        before != Some(marker) && after != Some(marker)
    }

    /// Underscore emphasis does not apply inside words.
    fn not_intraword(text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    }
}

impl SyntaxRule for Italic {
    fn name(&self) -> &'static str {
        "italic"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        scan_symmetric(
            ctx,
            Self::asterisks(),
            Self::MARKER_LEN,
            styles::EMPHASIS,
            |text, start, end| Self::not_adjacent_to(text, start, end, '*'),
        )?;
        scan_symmetric(
            ctx,
            Self::underscores(),
            Self::MARKER_LEN,
            styles::EMPHASIS,
            |text, start, end| {
                Self::not_adjacent_to(text, start, end, '_') && Self::not_intraword(text, start, end)
            },
        )
    }
}
