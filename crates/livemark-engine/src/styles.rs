//! Semantic style classes attached to mark decorations.
//!
//! These are opaque keys; the host maps them to whatever its rendering
//! surface uses (CSS classes, terminal styles, ...).

/// Bold run content.
pub const STRONG: &str = "md-strong";
/// Italic run content.
pub const EMPHASIS: &str = "md-em";
/// Strikethrough run content.
pub const STRIKE: &str = "md-strike";
/// Highlight (`==...==`) run content.
pub const HIGHLIGHT: &str = "md-highlight";
/// Inline code span content.
pub const INLINE_CODE: &str = "md-inline-code";

/// Heading content, by level (index 0 = `#`).
pub const HEADING: [&str; 6] = [
    "md-heading-1",
    "md-heading-2",
    "md-heading-3",
    "md-heading-4",
    "md-heading-5",
    "md-heading-6",
];

/// Syntax marker with the cursor nearby; raw markup stays visible.
pub const MARKER_ACTIVE: &str = "md-marker-active";
/// Syntax marker away from the cursor; the host dims or hides it.
pub const MARKER_DIM: &str = "md-marker-dim";

/// Fence line of a code block while editing.
pub const FENCE_LINE: &str = "md-fence-line";
/// Language tag on a fence-open line.
pub const FENCE_LANG: &str = "md-fence-lang";
/// Interior line of a code block while editing.
pub const CODE_LINE: &str = "md-code-line";

/// Raw-markup region shown as plain source while editing.
pub const HTML_RAW: &str = "md-html-raw";
/// Tag name inside a raw-markup region.
pub const HTML_TAG: &str = "md-html-tag";
/// Attribute name inside a raw-markup region.
pub const HTML_ATTR: &str = "md-html-attr";
/// Attribute value inside a raw-markup region.
pub const HTML_VALUE: &str = "md-html-value";
/// Bracket characters inside a raw-markup region, cycled by nesting depth.
pub const HTML_BRACKET: [&str; 3] = [
    "md-html-bracket-1",
    "md-html-bracket-2",
    "md-html-bracket-3",
];
