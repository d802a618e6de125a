//! Mask templates for the 4×4 layout.
//!
//! Each cell holds a group id; cells sharing a non-zero id form one line
//! group whose values must sum to the target. Id 0 leaves a cell out.

use std::fmt;
use std::str::FromStr;

use super::Mask;

/// Rows, one group per row.
pub const ROWS: Mask = [
    1, 1, 1, 1, //
    2, 2, 2, 2, //
    3, 3, 3, 3, //
    4, 4, 4, 4,
];

/// Columns, one group per column.
pub const COLUMNS: Mask = [
    1, 2, 3, 4, //
    1, 2, 3, 4, //
    1, 2, 3, 4, //
    1, 2, 3, 4,
];

/// Main diagonal (1) and anti-diagonal (2).
pub const DIAGONALS: Mask = [
    1, 0, 0, 2, //
    0, 1, 2, 0, //
    0, 2, 1, 0, //
    2, 0, 0, 1,
];

/// 2×2 quadrants.
pub const QUADRANTS: Mask = [
    1, 1, 2, 2, //
    1, 1, 2, 2, //
    3, 3, 4, 4, //
    3, 3, 4, 4,
];

/// Broken diagonals arranged as a latin square.
pub const BROKEN_DIAGONALS: Mask = [
    2, 4, 3, 1, //
    4, 2, 1, 3, //
    3, 1, 2, 4, //
    1, 3, 4, 2,
];

/// Corners and centre (1), edge pairs (2, 3, 4).
pub const CORNERS_AND_CENTRE: Mask = [
    2, 3, 3, 2, //
    4, 1, 1, 4, //
    4, 1, 1, 4, //
    2, 3, 3, 2,
];

/// Horizontal pairs mirrored through the centre.
pub const MIRRORED_PAIRS: Mask = [
    1, 1, 2, 2, //
    3, 3, 4, 4, //
    4, 4, 3, 3, //
    2, 2, 1, 1,
];

/// Horizontal pairs repeated on alternate rows.
pub const COLUMN_PAIRS: Mask = [
    1, 1, 4, 4, //
    2, 2, 3, 3, //
    1, 1, 4, 4, //
    2, 2, 3, 3,
];

/// Alternating cells on alternate rows.
pub const CHECKERED: Mask = [
    2, 1, 2, 1, //
    3, 4, 3, 4, //
    2, 1, 2, 1, //
    3, 4, 3, 4,
];

/// Named mask collections selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaskSet {
    /// Rows, columns and both diagonals.
    #[default]
    Standard,
    /// Standard plus the six auxiliary patterns.
    Extended,
    /// Rows only; a small instance for tests and experiments.
    Rows,
}

impl MaskSet {
    pub fn masks(self) -> Vec<Mask> {
        match self {
            MaskSet::Standard => vec![ROWS, COLUMNS, DIAGONALS],
            MaskSet::Extended => vec![
                ROWS,
                COLUMNS,
                DIAGONALS,
                QUADRANTS,
                BROKEN_DIAGONALS,
                CORNERS_AND_CENTRE,
                MIRRORED_PAIRS,
                COLUMN_PAIRS,
                CHECKERED,
            ],
            MaskSet::Rows => vec![ROWS],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MaskSet::Standard => "standard",
            MaskSet::Extended => "extended",
            MaskSet::Rows => "rows",
        }
    }
}

impl fmt::Display for MaskSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaskSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(MaskSet::Standard),
            "extended" => Ok(MaskSet::Extended),
            "rows" => Ok(MaskSet::Rows),
            other => Err(format!(
                "unknown mask set '{other}' (expected standard, extended or rows)"
            )),
        }
    }
}
