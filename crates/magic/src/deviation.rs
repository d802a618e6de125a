//! Error metric: how far a grid is from an exact solution.
//!
//! "Error" here is a numeric deviation, never a fault. It is always a finite
//! non-negative integer and zero marks an exact solution.

use crate::geometry::{Geometry, Grid, Subset};

/// |Σ grid[cells] − target|.
#[inline]
pub fn line_deviation(grid: &Grid, cells: Subset, target: i32) -> u32 {
    let sum: i32 = cells.indices().map(|i| grid[i]).sum();
    sum.abs_diff(target)
}

/// Sum of line deviations over every line group.
pub fn structural_error(geometry: &Geometry, grid: &Grid) -> u32 {
    let target = geometry.target();
    geometry
        .line_groups()
        .iter()
        .map(|&g| line_deviation(grid, g, target))
        .sum()
}

/// Distance between the number of distinct values in `grid` and the expected
/// count.
///
/// Values are tracked in a 64-bit set, so they must lie in `0..64`; the
/// search configuration guarantees that for every grid it builds.
pub fn distinctness_error(geometry: &Geometry, grid: &Grid) -> u32 {
    let seen = grid.iter().fold(0u64, |acc, &v| {
        debug_assert!((0..64).contains(&v), "value {v} outside the tracked span");
        acc | 1u64 << (v & 63)
    });
    geometry.distinct_values().abs_diff(seen.count_ones())
}

/// Structural plus distinctness error; the optimizer's only fitness signal.
#[inline]
pub fn total_error(geometry: &Geometry, grid: &Grid) -> u32 {
    structural_error(geometry, grid) + distinctness_error(geometry, grid)
}
