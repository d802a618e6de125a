//! Fixed tables for the 4×4 instance: line groups, subset catalog, flip maps.
//!
//! Purpose
//! - Bundle everything the search reads but never writes into one immutable
//!   `Geometry`, built once from a `GeometryCfg` and shared by reference
//!   across workers (no locking needed).
//! - Keep masks and the subset band swappable so tests can build smaller
//!   instances.
//!
//! Layout
//! - Cells are indexed 0..16 in row-major order; `index = 4 * row + col`.

mod catalog;
pub mod masks;


use std::fmt;
use std::ops::RangeInclusive;

pub use catalog::{Indices, Subset, SubsetCatalog};
pub use masks::MaskSet;

/// Cells per side.
pub const SIDE: usize = 4;
/// Cells per grid.
pub const CELLS: usize = SIDE * SIDE;

/// Grid values in row-major order.
pub type Grid = [i32; CELLS];
/// Group-id template over the grid; 0 means "no group".
pub type Mask = [u8; CELLS];
/// Cells whose values must sum to the target.
pub type LineGroup = Subset;

/// Mirror rows: row r ↔ row 3 − r.
pub const FLIP_X: [usize; CELLS] = [
    12, 13, 14, 15, //
    8, 9, 10, 11, //
    4, 5, 6, 7, //
    0, 1, 2, 3,
];

/// Mirror columns: column c ↔ column 3 − c.
pub const FLIP_Y: [usize; CELLS] = [
    3, 2, 1, 0, //
    7, 6, 5, 4, //
    11, 10, 9, 8, //
    15, 14, 13, 12,
];

/// The square used as a regression anchor: every line group of the standard
/// and extended masks sums to 33, but 10 and 14 appear twice.
pub const REFERENCE_GRID: Grid = [1, 14, 14, 4, 11, 7, 6, 9, 8, 10, 10, 5, 13, 2, 3, 15];

/// Errors raised while building the tables.
#[derive(Debug)]
pub enum GeometryError {
    InvalidConfig { reason: String },
    /// Reserving storage for the subset catalog failed.
    CatalogAllocation { entries: usize },
}

impl GeometryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid geometry config: {reason}"),
            Self::CatalogAllocation { entries } => {
                write!(f, "cannot allocate subset catalog of {entries} entries")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Inputs for building a [`Geometry`].
#[derive(Clone, Debug)]
pub struct GeometryCfg {
    /// Sum every line group (and every counted subset) must reach.
    pub target: i32,
    /// Number of distinct values an exact solution uses.
    pub distinct_values: u32,
    pub masks: Vec<Mask>,
    /// Subset sizes enumerated by the catalog.
    pub subset_sizes: RangeInclusive<usize>,
}

impl Default for GeometryCfg {
    fn default() -> Self {
        Self {
            target: 33,
            // 16 distinct positive values sum to at least 136 > 4 * 33.
            distinct_values: 15,
            masks: MaskSet::Standard.masks(),
            subset_sizes: 2..=CELLS,
        }
    }
}

impl GeometryCfg {
    pub fn with_masks(mut self, set: MaskSet) -> Self {
        self.masks = set.masks();
        self
    }

    pub fn with_subset_sizes(mut self, sizes: RangeInclusive<usize>) -> Self {
        self.subset_sizes = sizes;
        self
    }

    fn validate(&self) -> Result<(), GeometryError> {
        if self.masks.is_empty() {
            return Err(GeometryError::invalid("need at least one mask"));
        }
        if self.distinct_values == 0 || self.distinct_values as usize > CELLS {
            return Err(GeometryError::invalid(format!(
                "distinct_values must lie in 1..={CELLS}, got {}",
                self.distinct_values
            )));
        }
        if let Some(k) = self.masks.iter().position(|m| m.iter().all(|&id| id == 0)) {
            return Err(GeometryError::invalid(format!("mask {k} has no groups")));
        }
        Ok(())
    }
}

/// Immutable tables shared by all workers.
#[derive(Clone, Debug)]
pub struct Geometry {
    target: i32,
    distinct_values: u32,
    masks: Vec<Mask>,
    line_groups: Vec<LineGroup>,
    catalog: SubsetCatalog,
}

impl Geometry {
    pub fn new(cfg: GeometryCfg) -> Result<Self, GeometryError> {
        cfg.validate()?;
        let line_groups = cfg.masks.iter().flat_map(line_groups_of).collect();
        let catalog = SubsetCatalog::build(cfg.subset_sizes)?;
        Ok(Self {
            target: cfg.target,
            distinct_values: cfg.distinct_values,
            masks: cfg.masks,
            line_groups,
            catalog,
        })
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn distinct_values(&self) -> u32 {
        self.distinct_values
    }

    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    pub fn line_groups(&self) -> &[LineGroup] {
        &self.line_groups
    }

    pub fn catalog(&self) -> &SubsetCatalog {
        &self.catalog
    }
}

/// Line groups of one mask, in increasing group-id order; unused ids skipped.
pub fn line_groups_of(mask: &Mask) -> Vec<LineGroup> {
    let mut by_id = [0u16; 256];
    for (cell, &id) in mask.iter().enumerate() {
        if id > 0 {
            by_id[id as usize] |= 1 << cell;
        }
    }
    by_id
        .iter()
        .filter(|&&bits| bits != 0)
        .map(|&bits| Subset::from_bits(bits))
        .collect()
}

/// Image of `subset` under a flip map.
#[inline]
pub fn flip(subset: Subset, map: &[usize; CELLS]) -> Subset {
    subset.map(map)
}
