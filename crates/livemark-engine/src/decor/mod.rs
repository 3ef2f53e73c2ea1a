//! Decoration model: requests emitted by rules and regions, the sinks that
//! collect them, and the compositor that merges everything into one
//! position-ordered set per pass.

pub mod compose;
pub mod sink;
pub mod types;

pub use compose::{DecorationSet, compose};
pub use sink::{DecorationSink, OrderedBuilder};
pub use types::{Decoration, DecorationKind, MarkSpec, WidgetSpec};
