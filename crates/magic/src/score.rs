//! How interesting an exact solution is.
//!
//! - `combination_count`: catalog subsets that sum to the target.
//! - `symmetry_pair_count`: zero-deviation subsets whose mirror image (rows
//!   flipped, columns flipped, or both) is also zero-deviation, counted as
//!   distinct index sets.

use std::collections::HashSet;

use crate::deviation::line_deviation;
use crate::geometry::{Geometry, Grid, Subset, FLIP_X, FLIP_Y};

/// Both scores of one grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub combinations: usize,
    pub symmetry_pairs: usize,
}

pub fn score(geometry: &Geometry, grid: &Grid) -> Score {
    Score {
        combinations: combination_count(geometry, grid),
        symmetry_pairs: symmetry_pair_count(geometry, grid),
    }
}

/// Number of catalog entries summing exactly to the target.
pub fn combination_count(geometry: &Geometry, grid: &Grid) -> usize {
    let target = geometry.target();
    geometry
        .catalog()
        .iter()
        .filter(|&&s| line_deviation(grid, s, target) == 0)
        .count()
}

/// Number of distinct index sets that take part in at least one mirror pair.
///
/// For every zero-deviation subset, each mirror image that is also
/// zero-deviation puts both the subset and the image into the set. A subset
/// that is its own mirror image pairs with itself.
pub fn symmetry_pair_count(geometry: &Geometry, grid: &Grid) -> usize {
    let target = geometry.target();
    let zero = |s: Subset| line_deviation(grid, s, target) == 0;
    let mut paired: HashSet<Subset> = HashSet::new();

    for &subset in geometry.catalog() {
        if paired.contains(&subset) || !zero(subset) {
            continue;
        }
        let fx = subset.map(&FLIP_X);
        let fy = subset.map(&FLIP_Y);
        let fxy = fx.map(&FLIP_Y);
        for image in [fx, fy, fxy] {
            if zero(image) {
                paired.insert(subset);
                paired.insert(image);
            }
        }
    }
    paired.len()
}
