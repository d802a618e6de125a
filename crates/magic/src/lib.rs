//! Search engine for "interesting" 4×4 magic squares.
//!
//! A grid is an exact solution when every line group of the active masks sums
//! to the target (33) and the grid uses exactly the expected number of
//! distinct values. Among exact solutions the search prefers grids with more
//! mirror-symmetric zero-deviation subsets, then more zero-deviation subsets
//! overall.
//!
//! Layout
//! - `geometry`: masks, line groups, subset catalog, flip maps (immutable).
//! - `deviation`: the error metric driving the optimizer.
//! - `permutation`: lazy in-place shuffle with a resettable cursor.
//! - `climb`: first-improvement coordinate descent over single cells.
//! - `score`: combination and symmetry-pair counts of a solved grid.
//! - `search`: parallel workers racing against one shared best record.

pub mod climb;
pub mod deviation;
pub mod geometry;
pub mod permutation;
pub mod score;
pub mod search;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for callers (CLI, benches, tests).
pub mod prelude {
    pub use crate::climb::{
        climb_from_random, hill_climb, random_grid, Climb, ClimbCfg, ValueDomain,
    };
    pub use crate::deviation::{distinctness_error, line_deviation, structural_error, total_error};
    pub use crate::geometry::{
        Geometry, GeometryCfg, GeometryError, Grid, Mask, MaskSet, Subset, SubsetCatalog,
        REFERENCE_GRID,
    };
    pub use crate::permutation::PermutationCursor;
    pub use crate::score::{combination_count, score, symmetry_pair_count, Score};
    pub use crate::search::{
        run_search, BestRecord, CollectingSink, ConfigError, ResultSink, SearchCfg, SearchError,
        SearchSummary, SharedBest, Solution,
    };
}
