//! First-improvement coordinate descent over single cells.
//!
//! Model
//! - Visit cells in a random order; for each cell try candidate values in a
//!   random order. The first assignment that strictly lowers the total error
//!   is kept and both orders restart from the beginning (a new pass).
//! - A pass that visits all 16 cells without an improving assignment ends the
//!   climb: the grid is a local optimum of the single-cell neighbourhood.
//!
//! Both orders come from `PermutationCursor`s driven by the caller's RNG.

use rand::Rng;

use crate::deviation::total_error;
use crate::geometry::{Geometry, Grid, CELLS};
use crate::permutation::PermutationCursor;
use crate::search::ConfigError;

/// Inclusive range of cell values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueDomain {
    pub min: i32,
    pub max: i32,
}

impl ValueDomain {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn values(&self) -> Vec<i32> {
        (self.min..=self.max).collect()
    }

    pub fn contains(&self, v: i32) -> bool {
        (self.min..=self.max).contains(&v)
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::invalid(format!(
                "{name} domain {}..={} is empty",
                self.min, self.max
            )));
        }
        // Distinctness tracking uses a 64-bit set.
        if self.min < 0 || self.max > 63 {
            return Err(ConfigError::invalid(format!(
                "{name} domain {}..={} must lie within 0..=63",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Value domains for random starts and for candidate moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClimbCfg {
    /// Domain of the random starting grid.
    pub initial: ValueDomain,
    /// Values tried for a cell during descent.
    pub candidates: ValueDomain,
}

impl Default for ClimbCfg {
    fn default() -> Self {
        Self {
            initial: ValueDomain::new(1, 30),
            candidates: ValueDomain::new(1, 17),
        }
    }
}

impl ClimbCfg {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.initial.validate("initial")?;
        self.candidates.validate("candidate")
    }
}

/// Outcome of one climb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Climb {
    pub grid: Grid,
    pub error: u32,
    /// Accepted (strictly improving) assignments.
    pub moves: u32,
    /// Passes started, including the final unproductive one.
    pub passes: u32,
}

impl Climb {
    pub fn is_exact(&self) -> bool {
        self.error == 0
    }
}

/// Grid with every cell drawn uniformly from `domain`.
pub fn random_grid<R: Rng + ?Sized>(rng: &mut R, domain: ValueDomain) -> Grid {
    std::array::from_fn(|_| domain.sample(&mut *rng))
}

/// Descend from `grid` to a local optimum.
///
/// The running minimum starts at the grid's own error, so only strictly
/// improving assignments are ever kept and the error never increases.
pub fn hill_climb<R: Rng + ?Sized>(
    geometry: &Geometry,
    mut grid: Grid,
    candidates: ValueDomain,
    rng: &mut R,
) -> Climb {
    let mut min_error = total_error(geometry, &grid);
    let mut cells = PermutationCursor::new((0..CELLS).collect());
    let mut values = PermutationCursor::new(candidates.values());
    let mut moves = 0;
    let mut passes = 0;

    loop {
        passes += 1;
        if !improve_once(
            geometry,
            &mut grid,
            &mut min_error,
            &mut cells,
            &mut values,
            rng,
        ) {
            break;
        }
        moves += 1;
        cells.rewind();
        values.rewind();
    }

    Climb {
        grid,
        error: min_error,
        moves,
        passes,
    }
}

/// Random start followed by a climb.
pub fn climb_from_random<R: Rng + ?Sized>(
    geometry: &Geometry,
    cfg: &ClimbCfg,
    rng: &mut R,
) -> Climb {
    let grid = random_grid(rng, cfg.initial);
    hill_climb(geometry, grid, cfg.candidates, rng)
}

/// Continue the current pass; true on the first improving assignment.
fn improve_once<R: Rng + ?Sized>(
    geometry: &Geometry,
    grid: &mut Grid,
    min_error: &mut u32,
    cells: &mut PermutationCursor<usize>,
    values: &mut PermutationCursor<i32>,
    rng: &mut R,
) -> bool {
    while cells.advance(rng) {
        let cell = cells.current();
        let old = grid[cell];
        while values.advance(rng) {
            grid[cell] = values.current();
            let e = total_error(geometry, grid);
            if e < *min_error {
                *min_error = e;
                return true;
            }
            grid[cell] = old;
        }
    }
    false
}
