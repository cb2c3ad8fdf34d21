//! Per-record image carousel cursors

use readywall_core::RecordId;
use readywall_core::utils::wrap_index;
use std::collections::HashMap;

/// Unbounded cursor per record, reduced modulo the gallery size on read
///
/// Cursors are never clamped when stepped, so the gallery may grow or shrink
/// between reads without invalidating them.
#[derive(Debug, Clone, Default)]
pub struct CarouselCursors {
    cursors: HashMap<RecordId, i64>,
}

impl CarouselCursors {
    /// No cursors
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cursor for `id`; zero when never stepped
    pub fn cursor(&self, id: &RecordId) -> i64 {
        self.cursors.get(id).copied().unwrap_or(0)
    }

    /// Step forward
    pub fn next(&mut self, id: &RecordId) {
        self.step(id, 1);
    }

    /// Step backward
    pub fn prev(&mut self, id: &RecordId) {
        self.step(id, -1);
    }

    /// Jump to a position
    pub fn set(&mut self, id: &RecordId, cursor: i64) {
        self.cursors.insert(id.clone(), cursor);
    }

    fn step(&mut self, id: &RecordId, delta: i64) {
        let cursor = self.cursors.entry(id.clone()).or_insert(0);
        *cursor = cursor.wrapping_add(delta);
    }

    /// Displayed index into a gallery of `len` images; `None` when empty
    pub fn index(&self, id: &RecordId, len: usize) -> Option<usize> {
        wrap_index(self.cursor(id), len)
    }

    /// Displayed image out of `gallery`
    pub fn current<'a>(&self, id: &RecordId, gallery: &[&'a str]) -> Option<&'a str> {
        self.index(id, gallery.len())
            .and_then(|index| gallery.get(index).copied())
    }

    /// Forget the cursor for `id`
    pub fn reset(&mut self, id: &RecordId) {
        self.cursors.remove(id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_stepping_wraps_both_ways() {
        let id = RecordId::from("p1");
        let gallery = ["a.jpg", "b.jpg", "c.jpg"];
        let mut cursors = CarouselCursors::new();

        assert_eq!(cursors.current(&id, &gallery), Some("a.jpg"));

        cursors.prev(&id);
        assert_eq!(cursors.current(&id, &gallery), Some("c.jpg"));
        assert_eq!(cursors.cursor(&id), -1);

        cursors.next(&id);
        cursors.next(&id);
        cursors.next(&id);
        assert_eq!(cursors.current(&id, &gallery), Some("c.jpg"));
    }

    #[test]
    fn test_empty_gallery_has_no_index() {
        let id = RecordId::from("p1");
        let mut cursors = CarouselCursors::new();
        cursors.next(&id);

        assert_eq!(cursors.index(&id, 0), None);
        assert_eq!(cursors.current(&id, &[]), None);
    }

    #[test]
    fn test_cursors_are_per_record() {
        let (a, b) = (RecordId::from("a"), RecordId::from("b"));
        let mut cursors = CarouselCursors::new();

        cursors.next(&a);
        assert_eq!(cursors.index(&a, 4), Some(1));
        assert_eq!(cursors.index(&b, 4), Some(0));

        cursors.reset(&a);
        assert_eq!(cursors.cursor(&a), 0);
    }

    proptest! {
        #[test]
        fn displayed_index_is_double_modulo(k in -10_000i64..10_000, n in 1usize..20) {
            let id = RecordId::from("p");
            let mut cursors = CarouselCursors::new();
            cursors.set(&id, k);

            let n_i = i64::try_from(n).unwrap();
            let expected = usize::try_from(((k % n_i) + n_i) % n_i).unwrap();

            prop_assert_eq!(cursors.index(&id, n), Some(expected));
            prop_assert!(cursors.index(&id, n).unwrap() < n);
        }
    }
}
