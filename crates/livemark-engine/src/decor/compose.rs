use super::types::{Decoration, DecorationKind};

/// The final, position-ordered decoration sequence for one pass.
///
/// Created fresh on every recomputation and never mutated; the next pass
/// supersedes it wholesale. The host is expected to treat later entries on
/// the same range as layered on top of earlier ones, not replacing them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    items: Vec<Decoration>,
}

impl DecorationSet {
    #[must_use]
    pub fn items(&self) -> &[Decoration] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Merges rule output and region output into one conflict-free set.
///
/// Zero-width requests are discarded. Requests are ordered by start offset;
/// at equal starts a replace wins over any mark (the widget must paint),
/// inclusive-start marks come before exclusive ones, and remaining ties go
/// to the smaller end offset.
pub fn compose(
    rule_decorations: Vec<Decoration>,
    region_decorations: Vec<Decoration>,
) -> DecorationSet {
    let mut items: Vec<Decoration> = rule_decorations
        .into_iter()
        .chain(region_decorations)
        .filter(|d| !d.span.is_empty())
        .collect();

    items.sort_by_key(|d| (d.span.start, tie_rank(d), d.span.end));

    DecorationSet { items }
}

fn tie_rank(d: &Decoration) -> u8 {
    match &d.kind {
        DecorationKind::Replace(_) => 0,
        DecorationKind::Mark(spec) if spec.inclusive_start => 1,
        DecorationKind::Mark(_) => 2,
    }
}
