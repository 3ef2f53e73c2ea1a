//! Embedded raw-markup handling: region detection, edit/render mode
//! classification, and the decorations derived from both.

pub mod mode;
pub mod preview;
pub mod region;
pub mod tokenizer;

pub use mode::{EditModeSet, classify};
pub use preview::preview_text;
pub use region::{RawMarkupRegion, detect, is_void_tag};
pub use tokenizer::tokenize;

use crate::decor::{Decoration, WidgetSpec};
use crate::styles;

/// Turns classified regions into decoration requests.
///
/// Edit-mode regions get a raw-source mark plus readability token marks;
/// render-mode regions get a single preview-widget replace. Both the
/// tokenizer and the replace run only on outermost regions: containment
/// closure guarantees nested regions share their ancestor's mode, so an
/// outer replace subsumes them and an outer token pass already covers
/// their text.
pub fn region_decorations(regions: &[RawMarkupRegion], edit: &EditModeSet) -> Vec<Decoration> {
    let mut out = Vec::new();
    for (i, r) in regions.iter().enumerate() {
        let outermost = !regions
            .iter()
            .enumerate()
            .any(|(j, o)| j != i && o.span.properly_contains(r.span));

        if edit.contains(&i) {
            out.push(Decoration::mark(r.span.start, r.span.end, styles::HTML_RAW));
            if outermost {
                out.extend(tokenize(r.span.start, &r.content));
            }
        } else if outermost {
            out.push(Decoration::replace(
                r.span.start,
                r.span.end,
                WidgetSpec::RawMarkupPreview {
                    html: r.content.clone(),
                    block: r.is_multiline,
                },
            ));
        }
    }
    out
}
