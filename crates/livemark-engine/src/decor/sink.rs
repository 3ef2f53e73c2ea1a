use super::types::Decoration;

/// Output sink for decoration requests.
///
/// Two forms exist so newer rules and legacy rules interoperate: a plain
/// `Vec` that collects in emission order, and [`OrderedBuilder`], which
/// accepts requests in ascending start order the way a single-pass builder
/// does.
pub trait DecorationSink {
    fn add(&mut self, deco: Decoration);
}

impl DecorationSink for Vec<Decoration> {
    fn add(&mut self, deco: Decoration) {
        self.push(deco);
    }
}

/// Legacy single-pass builder: callers add requests front to back.
///
/// Out-of-order adds are tolerated and repaired on `finish` so a
/// mis-ordering rule degrades gracefully instead of corrupting the pass.
#[derive(Debug, Default)]
pub struct OrderedBuilder {
    items: Vec<Decoration>,
    sorted: bool,
}

impl OrderedBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            sorted: true,
        }
    }

    #[must_use]
    pub fn finish(mut self) -> Vec<Decoration> {
        if !self.sorted {
            self.items.sort_by_key(|d| d.span.start);
        }
        self.items
    }
}

impl DecorationSink for OrderedBuilder {
    fn add(&mut self, deco: Decoration) {
        if let Some(last) = self.items.last()
            && deco.span.start < last.span.start
        {
            self.sorted = false;
        }
        self.items.push(deco);
    }
}
