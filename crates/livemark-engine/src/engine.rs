//! Engine surface: the pure decoration function and the stateful wrapper
//! that decides when a recomputation pass is needed.
//!
//! Every pass is synchronous, self-contained, and covers the whole
//! document; the only state carried between passes is the cache used to
//! skip passes where neither text nor selection materially changed.

use std::collections::HashMap;

use xi_rope::Rope;

use crate::decor::{self, DecorationSet};
use crate::markup;
use crate::rules;
use crate::selection::{CursorSet, Selection};

/// Whole-document traversal mode.
///
/// Edit keeps raw markup visible with per-line styling; Render replaces
/// constructs with widgets where their rules support it. Cursor-proximity
/// marker toggling applies in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Edit,
    Render,
}

/// Effects the host dispatches to force engine state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEffect {
    SetMode(EditorMode),
}

/// Recognized configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Enables raw-markup region detection and rendering.
    pub highlight_html: bool,
    /// Maps a fenced-block language tag to the highlighter name the host
    /// should use. Unlisted tags pass through unchanged.
    pub code_languages: HashMap<String, String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            highlight_html: true,
            code_languages: HashMap::new(),
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn resolve_language(&self, tag: &str) -> String {
        self.code_languages
            .get(tag)
            .cloned()
            .unwrap_or_else(|| tag.to_string())
    }
}

/// One full decoration pass as a pure function of its inputs.
///
/// Running it twice on the same `(text, selection, mode)` yields an
/// identical set; nothing in the pass mutates the rope.
pub fn compute_decorations(
    text: &Rope,
    selection: &Selection,
    mode: EditorMode,
    options: &EngineOptions,
) -> DecorationSet {
    let source = text.slice_to_cow(0..text.len());
    let cursors = CursorSet::from_selection(selection);

    let rule_decorations = rules::run_rules(&source, 0, &cursors, mode, options);

    let region_decorations = if options.highlight_html {
        let regions = markup::detect(&source);
        let edit = markup::classify(&regions, &cursors);
        markup::region_decorations(&regions, &edit)
    } else {
        Vec::new()
    };

    decor::compose(rule_decorations, region_decorations)
}

/// Recompute trigger: owns the current decoration set and refreshes it on
/// document or selection change notifications from the host.
#[derive(Debug)]
pub struct LiveEngine {
    options: EngineOptions,
    mode: EditorMode,
    decorations: DecorationSet,
    last_version: Option<u64>,
    last_cursors: CursorSet,
}

impl LiveEngine {
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            mode: EditorMode::Render,
            decorations: DecorationSet::default(),
            last_version: None,
            last_cursors: CursorSet::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[must_use]
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn apply_effect(&mut self, effect: EngineEffect) {
        match effect {
            EngineEffect::SetMode(mode) => {
                if self.mode != mode {
                    self.mode = mode;
                    // next refresh must not hit the skip cache
                    self.last_version = None;
                }
            }
        }
    }

    /// Runs a pass unless neither text version nor cursors changed since
    /// the last one. Returns whether a recomputation happened.
    pub fn refresh(&mut self, version: u64, text: &Rope, selection: &Selection) -> bool {
        let cursors = CursorSet::from_selection(selection);
        if self.last_version == Some(version) && self.last_cursors == cursors {
            tracing::debug!(version, "decoration pass skipped, nothing changed");
            return false;
        }

        self.decorations = compute_decorations(text, selection, self.mode, &self.options);
        self.last_version = Some(version);
        self.last_cursors = cursors;
        tracing::debug!(
            version,
            decorations = self.decorations.len(),
            "decorations recomputed"
        );
        true
    }
}
