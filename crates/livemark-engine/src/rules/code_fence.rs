use super::{RuleContext, RuleError, SyntaxRule, lines_with_offsets};
use crate::decor::{Decoration, WidgetSpec};
use crate::engine::EditorMode;
use crate::styles;

/// Fenced code blocks: three or more backticks or tildes with an optional
/// language tag, closed by the first later line whose fence marker and
/// leading indentation match the opener exactly.
///
/// The traversal has two modes. Rendering replaces the whole block,
/// fences included, with a code-block widget carrying the de-indented
/// interior lines, the resolved language, and the verbatim source. Editing
/// leaves the text visible and emits line-level marks instead: fence lines,
/// the language tag, and atomic interior lines.
///
/// A fence that never finds a matching close is still open, not yet a
/// block, and stays undecorated.
pub struct CodeFence;

#[derive(Debug, Clone)]
struct FenceOpen<'a> {
    indent: &'a str,
    ch: u8,
    run: usize,
    /// Language tag and its byte range within the line.
    tag: Option<(std::ops::Range<usize>, &'a str)>,
}

impl CodeFence {
    pub const BACKTICK: char = '`';
    pub const TILDE: char = '~';
    pub const MIN_RUN: usize = 3;

    fn open(line: &str) -> Option<FenceOpen<'_>> {
        let trimmed = line.trim_start_matches([' ', '\t']);
        let indent_len = line.len() - trimmed.len();
        let ch = *trimmed.as_bytes().first()?;
        if ch != Self::BACKTICK as u8 && ch != Self::TILDE as u8 {
            return None;
        }
        let run = trimmed.bytes().take_while(|&b| b == ch).count();
        if run < Self::MIN_RUN {
            return None;
        }
        let after = &trimmed[run..];
        // A backtick fence's info string may not contain backticks.
        if ch == Self::BACKTICK as u8 && after.contains(Self::BACKTICK) {
            return None;
        }
        let ws = after.len() - after.trim_start().len();
        let tag = after
            .trim_start()
            .split_whitespace()
            .next()
            .map(|t| {
                let start = indent_len + run + ws;
                (start..start + t.len(), t)
            });
        Some(FenceOpen {
            indent: &line[..indent_len],
            ch,
            run,
            tag,
        })
    }

    fn closes(open: &FenceOpen<'_>, line: &str) -> bool {
        let Some(rest) = line.strip_prefix(open.indent) else {
            return false;
        };
        let t = rest.trim_end_matches([' ', '\t']);
        t.len() == open.run && t.bytes().all(|b| b == open.ch)
    }
}

impl SyntaxRule for CodeFence {
    fn name(&self) -> &'static str {
        "code-fence"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let lines: Vec<(usize, &str)> = lines_with_offsets(ctx.text()).collect();
        let mut i = 0usize;
        while i < lines.len() {
            let Some(open) = Self::open(lines[i].1) else {
                i += 1;
                continue;
            };
            let close = (i + 1..lines.len()).find(|&j| Self::closes(&open, lines[j].1));
            let Some(j) = close else {
                i += 1;
                continue;
            };
            match ctx.mode() {
                EditorMode::Render => emit_rendered(ctx, &lines, i, j, &open)?,
                EditorMode::Edit => emit_source(ctx, &lines, i, j, &open)?,
            }
            i = j + 1;
        }
        Ok(())
    }
}

fn emit_rendered(
    ctx: &mut RuleContext<'_>,
    lines: &[(usize, &str)],
    i: usize,
    j: usize,
    open: &FenceOpen<'_>,
) -> Result<(), RuleError> {
    let (open_start, _) = lines[i];
    let (close_start, close_line) = lines[j];
    let span_end = close_start + close_line.len();

    let code_lines: Vec<String> = lines[i + 1..j]
        .iter()
        .map(|&(_, l)| l.strip_prefix(open.indent).unwrap_or(l).to_string())
        .collect();
    let raw = ctx.text()[open_start..span_end].to_string();
    let language = open
        .tag
        .as_ref()
        .map(|(_, t)| ctx.options().resolve_language(t));

    ctx.emit(Decoration::replace(
        ctx.abs(open_start),
        ctx.abs(span_end),
        WidgetSpec::CodeBlock {
            lines: code_lines,
            language,
            raw,
        },
    ))
}

fn emit_source(
    ctx: &mut RuleContext<'_>,
    lines: &[(usize, &str)],
    i: usize,
    j: usize,
    open: &FenceOpen<'_>,
) -> Result<(), RuleError> {
    let (open_start, open_line) = lines[i];
    ctx.emit(
        Decoration::mark(
            ctx.abs(open_start),
            ctx.abs(open_start + open_line.len()),
            styles::FENCE_LINE,
        )
        .line(),
    )?;
    if let Some((range, _)) = &open.tag {
        ctx.emit(Decoration::mark(
            ctx.abs(open_start + range.start),
            ctx.abs(open_start + range.end),
            styles::FENCE_LANG,
        ))?;
    }
    for &(line_start, line) in &lines[i + 1..j] {
        ctx.emit(
            Decoration::mark(
                ctx.abs(line_start),
                ctx.abs(line_start + line.len()),
                styles::CODE_LINE,
            )
            .line()
            .atomic(),
        )?;
    }
    let (close_start, close_line) = lines[j];
    ctx.emit(
        Decoration::mark(
            ctx.abs(close_start),
            ctx.abs(close_start + close_line.len()),
            styles::FENCE_LINE,
        )
        .line(),
    )
}
