//! Cell subsets and the catalog of all k-subsets of the 16 cells.

use std::ops::RangeInclusive;

use super::{GeometryError, CELLS};

/// A set of cell indices, stored as a 16-bit membership mask.
///
/// The mask doubles as the canonical key of the index set: two subsets reached
/// through different paths (catalog entry, flipped image) compare equal iff
/// they hold the same cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subset(u16);

impl Subset {
    /// Build from cell indices. Duplicates collapse; indices must be `< 16`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let bits = indices.into_iter().fold(0u16, |acc, i| {
            debug_assert!(i < CELLS, "cell index {i} out of range");
            acc | (1 << i)
        });
        Subset(bits)
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Subset(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, index: usize) -> bool {
        index < CELLS && self.0 & (1 << index) != 0
    }

    /// Indices in strictly increasing order.
    #[inline]
    pub fn indices(self) -> Indices {
        Indices(self.0)
    }

    /// Image of this subset under an index permutation.
    pub fn map(self, perm: &[usize; CELLS]) -> Subset {
        Subset::from_indices(self.indices().map(|i| perm[i]))
    }
}

/// Iterator over the set bits of a [`Subset`], lowest first.
#[derive(Clone, Debug)]
pub struct Indices(u16);

impl Iterator for Indices {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let i = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Indices {}

/// Every subset of the 16 cells whose size lies in a band of k values.
///
/// Entries are ordered by increasing k, lexicographically within one k.
#[derive(Clone, Debug)]
pub struct SubsetCatalog {
    sizes: RangeInclusive<usize>,
    subsets: Vec<Subset>,
}

impl SubsetCatalog {
    /// Materialize the catalog for subset sizes `sizes` (each within `1..=16`).
    ///
    /// Storage is reserved up front with `try_reserve`, so running out of
    /// memory is reported as [`GeometryError::CatalogAllocation`].
    pub fn build(sizes: RangeInclusive<usize>) -> Result<Self, GeometryError> {
        let (lo, hi) = (*sizes.start(), *sizes.end());
        if lo == 0 || hi > CELLS || lo > hi {
            return Err(GeometryError::invalid(format!(
                "subset sizes {lo}..={hi} must be a non-empty band within 1..={CELLS}"
            )));
        }
        let total: usize = sizes.clone().map(|k| binomial(CELLS, k)).sum();
        let mut subsets = Vec::new();
        subsets
            .try_reserve_exact(total)
            .map_err(|_| GeometryError::CatalogAllocation { entries: total })?;

        for k in sizes.clone() {
            // Lexicographic k-combinations of 0..16.
            let mut idx: Vec<usize> = (0..k).collect();
            loop {
                subsets.push(Subset::from_indices(idx.iter().copied()));
                let Some(pos) = (0..k).rev().find(|&p| idx[p] != p + CELLS - k) else {
                    break;
                };
                idx[pos] += 1;
                for q in pos + 1..k {
                    idx[q] = idx[q - 1] + 1;
                }
            }
        }
        debug_assert_eq!(subsets.len(), total);
        Ok(Self { sizes, subsets })
    }

    pub fn sizes(&self) -> RangeInclusive<usize> {
        self.sizes.clone()
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subset> {
        self.subsets.iter()
    }

    pub fn as_slice(&self) -> &[Subset] {
        &self.subsets
    }
}

impl<'a> IntoIterator for &'a SubsetCatalog {
    type Item = &'a Subset;
    type IntoIter = std::slice::Iter<'a, Subset>;

    fn into_iter(self) -> Self::IntoIter {
        self.subsets.iter()
    }
}

/// n choose k for small n (exact in `usize`).
pub(crate) fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}
