use std::sync::OnceLock;

use regex::Regex;

use super::{RuleContext, RuleError, SyntaxRule, lines_with_offsets};
use crate::decor::Decoration;
use crate::styles;

/// ATX headings: one to six `#` characters at line start.
///
/// Uses a one-character slack so the heading stays active while the
/// trailing space after the markers is being typed.
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const SLACK: usize = 1;

    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^(#{1,6})(?:([ \t]+)(.*))?$").expect("invalid heading pattern"))
    }
}

impl SyntaxRule for Heading {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        for (line_start, line) in lines_with_offsets(ctx.text()) {
            let Some(caps) = Self::pattern().captures(line) else {
                continue;
            };
            let Some(hashes) = caps.get(1) else { continue };
            let level = hashes.as_str().len();
            let marker_end = caps.get(2).map_or(hashes.end(), |ws| ws.end());
            let line_end = line_start + line.len();

            let near = ctx
                .cursors()
                .is_near(ctx.abs(line_start), ctx.abs(line_end), Self::SLACK);
            let class = if near {
                styles::MARKER_ACTIVE
            } else {
                styles::MARKER_DIM
            };
            let mut marker =
                Decoration::mark(ctx.abs(line_start), ctx.abs(line_start + marker_end), class);
            if near {
                marker = marker.inclusive();
            }
            ctx.emit(marker)?;

            // Bare `#` keeps its marker decoration but has no content to style.
            if let Some(content) = caps.get(3)
                && !content.as_str().is_empty()
            {
                ctx.emit(Decoration::mark(
                    ctx.abs(line_start + content.start()),
                    ctx.abs(line_start + content.end()),
                    styles::HEADING[level - 1],
                ))?;
            }
        }
        Ok(())
    }
}
