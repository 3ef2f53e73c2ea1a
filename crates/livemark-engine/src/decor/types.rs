use crate::rope::span::Span;

/// Rendering-surface-agnostic widget payloads for replace decorations.
///
/// The engine only describes what to draw; the host owns the renderer switch
/// that turns a variant into actual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetSpec {
    /// Bullet glyph substituted for an unordered list marker.
    ListBullet,
    /// Vertical bar segments substituted for a blockquote marker run.
    BlockquoteBar { level: u8 },
    /// Thematic-break line.
    HorizontalRule,
    /// Rendered code block replacing a fenced region.
    CodeBlock {
        /// De-indented interior lines.
        lines: Vec<String>,
        /// Language tag after lookup through the configured table.
        language: Option<String>,
        /// Verbatim source of the whole block, fences included. Kept so the
        /// host can offer a copy action without consulting the buffer.
        raw: String,
    },
    /// Opaque preview of a raw-markup region.
    RawMarkupPreview {
        /// Verbatim source of the region.
        html: String,
        /// True when the region spans more than one line.
        block: bool,
    },
}

/// Styling payload of a mark decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkSpec {
    /// Semantic style class; the host maps it to concrete styling.
    pub class: &'static str,
    /// Text inserted at `from` joins this mark.
    pub inclusive_start: bool,
    /// Text inserted at `to` joins this mark.
    pub inclusive_end: bool,
    /// Applies to whole lines rather than an inline range.
    pub line: bool,
    /// The host should treat the span as one unit: suppress other rules'
    /// decorations inside it and move the cursor across it in one step.
    pub atomic: bool,
}

impl MarkSpec {
    #[must_use]
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            inclusive_start: false,
            inclusive_end: false,
            line: false,
            atomic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    Mark(MarkSpec),
    Replace(WidgetSpec),
}

/// One render instruction: style a span, or substitute a widget for it.
///
/// Immutable once created. `span.start <= span.end` always holds for
/// decorations built through the constructors; zero-width spans survive
/// construction but are discarded by the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub span: Span,
    pub kind: DecorationKind,
}

impl Decoration {
    #[must_use]
    pub fn mark(from: usize, to: usize, class: &'static str) -> Self {
        Self {
            span: Span::new(from, to),
            kind: DecorationKind::Mark(MarkSpec::new(class)),
        }
    }

    #[must_use]
    pub fn mark_with(from: usize, to: usize, spec: MarkSpec) -> Self {
        Self {
            span: Span::new(from, to),
            kind: DecorationKind::Mark(spec),
        }
    }

    #[must_use]
    pub fn replace(from: usize, to: usize, widget: WidgetSpec) -> Self {
        Self {
            span: Span::new(from, to),
            kind: DecorationKind::Replace(widget),
        }
    }

    /// Marks both edges inclusive, so typing at either boundary stays
    /// inside the styled range.
    #[must_use]
    pub fn inclusive(mut self) -> Self {
        if let DecorationKind::Mark(ref mut spec) = self.kind {
            spec.inclusive_start = true;
            spec.inclusive_end = true;
        }
        self
    }

    /// Converts a mark into a line-level mark.
    #[must_use]
    pub fn line(mut self) -> Self {
        if let DecorationKind::Mark(ref mut spec) = self.kind {
            spec.line = true;
        }
        self
    }

    /// Flags a mark as atomic.
    #[must_use]
    pub fn atomic(mut self) -> Self {
        if let DecorationKind::Mark(ref mut spec) = self.kind {
            spec.atomic = true;
        }
        self
    }

    #[must_use]
    pub fn is_replace(&self) -> bool {
        matches!(self.kind, DecorationKind::Replace(_))
    }

    /// The style class of a mark, if this is one.
    #[must_use]
    pub fn class(&self) -> Option<&'static str> {
        match &self.kind {
            DecorationKind::Mark(spec) => Some(spec.class),
            DecorationKind::Replace(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles;

    #[test]
    fn mark_defaults_are_exclusive() {
        let d = Decoration::mark(0, 4, styles::STRONG);
        match d.kind {
            DecorationKind::Mark(spec) => {
                assert!(!spec.inclusive_start);
                assert!(!spec.inclusive_end);
                assert!(!spec.line);
                assert!(!spec.atomic);
            }
            _ => panic!("expected mark"),
        }
    }

    #[test]
    fn builders_set_flags() {
        let d = Decoration::mark(0, 4, styles::CODE_LINE).line().atomic();
        match d.kind {
            DecorationKind::Mark(spec) => {
                assert!(spec.line);
                assert!(spec.atomic);
            }
            _ => panic!("expected mark"),
        }
    }

    #[test]
    fn inclusive_is_a_no_op_on_replace() {
        let d = Decoration::replace(0, 1, WidgetSpec::ListBullet).inclusive();
        assert!(d.is_replace());
    }
}
