//! Parallel search: independent workers racing against one shared best record.
//!
//! Model
//! - Each worker owns its RNG and grid and loops for a fixed trial budget:
//!   random grid → hill climb → (exact?) score → publish if better.
//! - The only shared mutable state is the `BestRecord` behind one mutex. The
//!   compare, the update and the hand-off to the sink happen in a single
//!   critical section, so accepted records strictly increase and reach the
//!   sink in acceptance order.
//! - `Geometry` is shared by reference and never written.
//!
//! Workers run on a dedicated rayon pool with exactly `workers` threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::climb::{climb_from_random, ClimbCfg};
use crate::geometry::{Geometry, Grid};
use crate::score::score;

/// Invalid search or climb parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidParams { reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid search params: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum SearchError {
    Config(ConfigError),
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::ThreadPool(e) => write!(f, "cannot start worker pool: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::ThreadPool(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SearchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for SearchError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e)
    }
}

/// Search parameters supplied by the caller.
#[derive(Clone, Debug)]
pub struct SearchCfg {
    /// Parallel workers (threads in the pool).
    pub workers: usize,
    /// Random starts per worker.
    pub trials_per_worker: u64,
    /// Base seed for the per-worker RNGs; fresh entropy when `None`.
    pub seed: Option<u64>,
    pub climb: ClimbCfg,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            workers: 10,
            trials_per_worker: 10_000_000,
            seed: None,
            climb: ClimbCfg::default(),
        }
    }
}

impl SearchCfg {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::invalid("need at least one worker"));
        }
        self.climb.validate()
    }
}

/// An exact solution as handed to the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Total error; 0 for every published solution.
    pub error: u32,
    pub combinations: usize,
    pub symmetry_pairs: usize,
    pub grid: Grid,
}

impl Solution {
    pub fn record(&self) -> BestRecord {
        BestRecord {
            symmetry_pairs: self.symmetry_pairs,
            combinations: self.combinations,
        }
    }
}

impl fmt::Display for Solution {
    /// `error, combinations, symmetry_pairs, [c0 c1 … c15]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}, {}, {}, [",
            self.error as f64, self.combinations, self.symmetry_pairs
        )?;
        for (i, v) in self.grid.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

/// Solution quality, ordered by symmetry pairs first, then combinations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BestRecord {
    pub symmetry_pairs: usize,
    pub combinations: usize,
}

/// Receives every accepted solution.
///
/// Called while the best-record lock is held; keep it short.
pub trait ResultSink: Sync {
    fn publish(&self, solution: &Solution);
}

impl<F> ResultSink for F
where
    F: Fn(&Solution) + Sync,
{
    fn publish(&self, solution: &Solution) {
        self(solution)
    }
}

/// Sink that keeps every published solution in order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    solutions: Mutex<Vec<Solution>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_solutions(self) -> Vec<Solution> {
        self.solutions
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        lock(&self.solutions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for CollectingSink {
    fn publish(&self, solution: &Solution) {
        lock(&self.solutions).push(solution.clone());
    }
}

/// The shared best record.
#[derive(Debug, Default)]
pub struct SharedBest {
    record: Mutex<BestRecord>,
}

impl SharedBest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> BestRecord {
        *lock(&self.record)
    }

    /// Accept `candidate` iff it is strictly better than the current record.
    ///
    /// `on_accept` runs inside the critical section, after the update.
    pub fn offer<F: FnOnce()>(&self, candidate: BestRecord, on_accept: F) -> bool {
        let mut best = lock(&self.record);
        if candidate <= *best {
            return false;
        }
        *best = candidate;
        on_accept();
        true
    }
}

/// Lock ignoring poisoning; the guarded values are plain data.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Totals of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchSummary {
    pub best: BestRecord,
    pub workers: usize,
    pub trials: u64,
    pub exact_solutions: u64,
    pub published: u64,
    pub base_seed: u64,
}

/// Run `cfg.workers` workers to completion and report what they found.
pub fn run_search<S>(
    geometry: &Geometry,
    cfg: &SearchCfg,
    sink: &S,
) -> Result<SearchSummary, SearchError>
where
    S: ResultSink + ?Sized,
{
    cfg.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.workers)
        .thread_name(|i| format!("magic-worker-{i}"))
        .build()?;

    let base_seed = cfg.seed.unwrap_or_else(rand::random);
    let best = SharedBest::new();
    let totals = Totals::default();

    pool.scope(|s| {
        for worker_id in 0..cfg.workers {
            let (best, totals) = (&best, &totals);
            s.spawn(move |_| {
                let rng = SmallRng::seed_from_u64(splitmix64(base_seed ^ worker_id as u64));
                run_worker(geometry, cfg, rng, best, sink, totals);
            });
        }
    });

    Ok(SearchSummary {
        best: best.get(),
        workers: cfg.workers,
        trials: totals.trials.load(Ordering::Relaxed),
        exact_solutions: totals.exact.load(Ordering::Relaxed),
        published: totals.published.load(Ordering::Relaxed),
        base_seed,
    })
}

#[derive(Default)]
struct Totals {
    trials: AtomicU64,
    exact: AtomicU64,
    published: AtomicU64,
}

fn run_worker<S: ResultSink + ?Sized>(
    geometry: &Geometry,
    cfg: &SearchCfg,
    mut rng: SmallRng,
    best: &SharedBest,
    sink: &S,
    totals: &Totals,
) {
    let (mut exact, mut published) = (0u64, 0u64);
    for _ in 0..cfg.trials_per_worker {
        let climb = climb_from_random(geometry, &cfg.climb, &mut rng);
        if !climb.is_exact() {
            continue;
        }
        exact += 1;
        let scored = score(geometry, &climb.grid);
        let solution = Solution {
            error: climb.error,
            combinations: scored.combinations,
            symmetry_pairs: scored.symmetry_pairs,
            grid: climb.grid,
        };
        if best.offer(solution.record(), || sink.publish(&solution)) {
            published += 1;
        }
    }
    totals.trials.fetch_add(cfg.trials_per_worker, Ordering::Relaxed);
    totals.exact.fetch_add(exact, Ordering::Relaxed);
    totals.published.fetch_add(published, Ordering::Relaxed);
}

/// SplitMix64 finalizer; decorrelates per-worker seeds derived from one base.
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deviation::total_error;
    use crate::geometry::GeometryCfg;

    fn rec(symmetry_pairs: usize, combinations: usize) -> BestRecord {
        BestRecord {
            symmetry_pairs,
            combinations,
        }
    }

    #[test]
    fn record_order_is_symmetry_first() {
        assert!(rec(5, 1) > rec(4, 999));
        assert!(rec(4, 10) > rec(4, 9));
        assert_eq!(rec(0, 0), BestRecord::default());
    }

    #[test]
    fn best_keeps_the_larger_record_in_either_order() {
        for (first, second) in [(rec(3, 10), rec(5, 2)), (rec(5, 2), rec(3, 10))] {
            let best = SharedBest::new();
            let mut accepted = Vec::new();
            best.offer(first, || accepted.push(first));
            best.offer(second, || accepted.push(second));
            assert_eq!(best.get(), rec(5, 2));
            assert!(accepted.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn equal_record_is_rejected() {
        let best = SharedBest::new();
        assert!(best.offer(rec(2, 2), || {}));
        assert!(!best.offer(rec(2, 2), || panic!("must not publish")));
        assert!(!best.offer(rec(0, 0), || panic!("must not publish")));
    }

    #[test]
    fn concurrent_offers_publish_strictly_increasing() {
        let best = SharedBest::new();
        let log = Mutex::new(Vec::new());
        std::thread::scope(|s| {
            for t in 0..8usize {
                let (best, log) = (&best, &log);
                s.spawn(move || {
                    for i in 0..200usize {
                        let r = rec((i * 7 + t * 13) % 50, (i * 31 + t) % 97);
                        best.offer(r, || log.lock().unwrap().push(r));
                    }
                });
            }
        });
        let log = log.into_inner().unwrap();
        assert!(log.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(best.get(), *log.last().unwrap());
        let max = (0..8usize)
            .flat_map(|t| {
                (0..200usize).map(move |i| rec((i * 7 + t * 13) % 50, (i * 31 + t) % 97))
            })
            .max()
            .unwrap();
        assert_eq!(best.get(), max);
    }

    #[test]
    fn solution_line_format() {
        let s = Solution {
            error: 0,
            combinations: 323,
            symmetry_pairs: 122,
            grid: [13, 7, 2, 11, 3, 5, 10, 15, 9, 4, 14, 6, 8, 17, 7, 1],
        };
        assert_eq!(
            s.to_string(),
            "0.000000, 323, 122, [13 7 2 11 3 5 10 15 9 4 14 6 8 17 7 1]"
        );
    }

    #[test]
    fn zero_workers_is_rejected() {
        let geo = Geometry::new(GeometryCfg::default().with_subset_sizes(2..=2)).unwrap();
        let cfg = SearchCfg {
            workers: 0,
            ..SearchCfg::default()
        };
        let err = run_search(&geo, &cfg, &CollectingSink::new()).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn small_run_publishes_exact_solutions() {
        let geo = Geometry::new(GeometryCfg::default()).unwrap();
        let cfg = SearchCfg {
            workers: 4,
            trials_per_worker: 2_000,
            seed: Some(0x5eed),
            climb: ClimbCfg::default(),
        };
        let sink = CollectingSink::new();
        let summary = run_search(&geo, &cfg, &sink).unwrap();
        let published = sink.into_solutions();

        assert_eq!(summary.trials, 8_000);
        assert!(summary.exact_solutions >= 1);
        assert!(!published.is_empty());
        assert_eq!(published.len() as u64, summary.published);
        for s in &published {
            assert_eq!(s.error, 0);
            assert_eq!(total_error(&geo, &s.grid), 0);
            assert_eq!(crate::score::score(&geo, &s.grid).combinations, s.combinations);
            assert!(s.symmetry_pairs <= s.combinations);
        }
        let records: Vec<BestRecord> = published.iter().map(Solution::record).collect();
        assert!(records.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(summary.best, *records.last().unwrap());
    }

    #[test]
    fn seeded_runs_agree_on_totals_and_best() {
        let geo = Geometry::new(GeometryCfg::default().with_subset_sizes(2..=4)).unwrap();
        let cfg = SearchCfg {
            workers: 3,
            trials_per_worker: 300,
            seed: Some(42),
            climb: ClimbCfg::default(),
        };
        let a = run_search(&geo, &cfg, &|_: &Solution| {}).unwrap();
        let b = run_search(&geo, &cfg, &|_: &Solution| {}).unwrap();
        assert_eq!(a.base_seed, 42);
        assert_eq!(a.exact_solutions, b.exact_solutions);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn worker_seeds_differ() {
        let seeds: Vec<u64> = (0..10u64).map(|id| splitmix64(7 ^ id)).collect();
        let mut uniq = seeds.clone();
        uniq.sort_unstable();
        uniq.dedup();
        assert_eq!(uniq.len(), seeds.len());
    }
}
