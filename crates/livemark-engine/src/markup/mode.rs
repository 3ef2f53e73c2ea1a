use std::collections::BTreeSet;

use super::region::RawMarkupRegion;
use crate::selection::CursorSet;

/// Region indices classified as edit-mode for the current pass.
pub type EditModeSet = BTreeSet<usize>;

/// Splits regions into edit mode (cursor nearby, raw source shown) and
/// render mode (replaced by a preview widget).
///
/// Seed: a region whose span a cursor touches, boundaries included. The
/// mode is contagious across containment in both directions, iterated to a
/// fixed point, so editing inside a nested structure never collapses an
/// ancestor or descendant into a widget mid-edit.
pub fn classify(regions: &[RawMarkupRegion], cursors: &CursorSet) -> EditModeSet {
    let mut edit: EditModeSet = regions
        .iter()
        .enumerate()
        .filter(|(_, r)| cursors.touches(r.span.start, r.span.end))
        .map(|(i, _)| i)
        .collect();

    loop {
        let mut grew = false;
        for i in 0..regions.len() {
            if !edit.contains(&i) {
                continue;
            }
            for j in 0..regions.len() {
                if edit.contains(&j) {
                    continue;
                }
                let a = regions[i].span;
                let b = regions[j].span;
                if a.properly_contains(b) || b.properly_contains(a) {
                    edit.insert(j);
                    grew = true;
                }
            }
        }
        if !grew {
            break;
        }
    }

    edit
}
