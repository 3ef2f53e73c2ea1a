pub mod decor;
pub mod engine;
pub mod markup;
pub mod rope;
pub mod rules;
pub mod selection;
pub mod styles;

// Re-export key types for easier usage
pub use decor::{
    Decoration, DecorationKind, DecorationSet, DecorationSink, MarkSpec, OrderedBuilder,
    WidgetSpec, compose,
};
pub use engine::{EditorMode, EngineEffect, EngineOptions, LiveEngine, compute_decorations};
pub use rope::span::Span;
pub use selection::{CursorSet, SelRange, Selection};
