//! Lazy in-place shuffle with a resettable cursor.
//!
//! Each `advance` performs one step of Fisher–Yates: swap the slot under the
//! cursor with a uniformly random slot at or after it, then step forward. A
//! full pass therefore yields a uniform permutation, and since swaps persist,
//! the next pass reshuffles the already shuffled sequence without
//! reallocating.
//!
//! `rewind` only moves the cursor back to the start. It does not reshuffle;
//! the next pass does that as a side effect. The optimizer's trajectory
//! depends on this distinction.

use rand::Rng;

#[derive(Clone, Debug)]
pub struct PermutationCursor<T> {
    items: Vec<T>,
    pos: usize,
}

impl<T: Copy> PermutationCursor<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, pos: 0 }
    }

    /// Draw the next element of the current pass.
    ///
    /// Returns `false` (and rewinds) once the pass is exhausted.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.pos >= self.items.len() {
            self.rewind();
            return false;
        }
        let j = rng.gen_range(self.pos..self.items.len());
        self.items.swap(self.pos, j);
        self.pos += 1;
        true
    }

    /// Element drawn by the last successful `advance`.
    ///
    /// Panics if no element has been drawn in the current pass.
    #[inline]
    pub fn current(&self) -> T {
        assert!(self.pos > 0, "current() called before advance()");
        self.items[self.pos - 1]
    }

    /// Move the cursor back to the start, keeping the current order.
    #[inline]
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements drawn so far in this pass.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drain<R: Rng>(p: &mut PermutationCursor<usize>, rng: &mut R) -> Vec<usize> {
        let mut out = Vec::new();
        while p.advance(rng) {
            out.push(p.current());
        }
        out
    }

    #[test]
    fn full_pass_visits_each_element_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = PermutationCursor::new((0..16).collect());
        for _ in 0..5 {
            let mut seen = drain(&mut p, &mut rng);
            assert_eq!(seen.len(), 16);
            seen.sort_unstable();
            assert_eq!(seen, (0..16).collect::<Vec<_>>());
        }
    }

    #[test]
    fn exhaustion_rewinds_automatically() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = PermutationCursor::new(vec![3usize, 4, 5]);
        assert_eq!(drain(&mut p, &mut rng).len(), 3);
        assert_eq!(p.position(), 0);
        assert!(p.advance(&mut rng));
    }

    #[test]
    fn pass_order_matches_storage_after_pass() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut p = PermutationCursor::new((0..10).collect());
        let order = drain(&mut p, &mut rng);
        assert_eq!(order, p.as_slice());
    }

    #[test]
    fn rewind_keeps_contents() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = PermutationCursor::new((0..8).collect());
        for _ in 0..4 {
            assert!(p.advance(&mut rng));
        }
        let before = p.as_slice().to_vec();
        p.rewind();
        assert_eq!(p.position(), 0);
        assert_eq!(p.as_slice(), &before[..]);
    }

    #[test]
    fn empty_cursor_is_always_exhausted() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut p: PermutationCursor<i32> = PermutationCursor::new(Vec::new());
        assert!(p.is_empty());
        assert!(!p.advance(&mut rng));
        assert!(!p.advance(&mut rng));
    }

    #[test]
    #[should_panic]
    fn current_before_advance_panics() {
        let p = PermutationCursor::new(vec![1, 2, 3]);
        let _ = p.current();
    }
}
