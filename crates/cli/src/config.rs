//! Run settings: command-line flags layered over an optional JSON file.

use anyhow::{bail, Context, Result};
use clap::Args;
use magic::prelude::{ClimbCfg, GeometryCfg, MaskSet, SearchCfg, ValueDomain};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every field is optional; unset fields fall back to the file, then to the
/// library defaults.
#[derive(Args, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    /// Parallel workers
    #[arg(long)]
    pub workers: Option<usize>,
    /// Random starts per worker
    #[arg(long)]
    pub trials: Option<u64>,
    /// Base seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
    /// Mask set: standard, extended or rows
    #[arg(long)]
    pub masks: Option<String>,
    /// Smallest subset size counted as a combination
    #[arg(long)]
    pub min_size: Option<usize>,
    /// Largest subset size counted as a combination
    #[arg(long)]
    pub max_size: Option<usize>,
    #[arg(long)]
    pub initial_min: Option<i32>,
    #[arg(long)]
    pub initial_max: Option<i32>,
    #[arg(long)]
    pub candidate_min: Option<i32>,
    #[arg(long)]
    pub candidate_max: Option<i32>,
}

impl RunSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Fields set in `self` win over those in `base`.
    pub fn over(self, base: RunSettings) -> RunSettings {
        RunSettings {
            workers: self.workers.or(base.workers),
            trials: self.trials.or(base.trials),
            seed: self.seed.or(base.seed),
            masks: self.masks.or(base.masks),
            min_size: self.min_size.or(base.min_size),
            max_size: self.max_size.or(base.max_size),
            initial_min: self.initial_min.or(base.initial_min),
            initial_max: self.initial_max.or(base.initial_max),
            candidate_min: self.candidate_min.or(base.candidate_min),
            candidate_max: self.candidate_max.or(base.candidate_max),
        }
    }

    pub fn mask_set(&self) -> Result<MaskSet> {
        match &self.masks {
            Some(name) => name.parse::<MaskSet>().map_err(anyhow::Error::msg),
            None => Ok(MaskSet::default()),
        }
    }

    pub fn geometry_cfg(&self) -> Result<GeometryCfg> {
        let base = GeometryCfg::default();
        let lo = self.min_size.unwrap_or(*base.subset_sizes.start());
        let hi = self.max_size.unwrap_or(*base.subset_sizes.end());
        if lo > hi {
            bail!("min_size {lo} exceeds max_size {hi}");
        }
        Ok(base.with_masks(self.mask_set()?).with_subset_sizes(lo..=hi))
    }

    pub fn search_cfg(&self) -> SearchCfg {
        let base = SearchCfg::default();
        let climb = ClimbCfg::default();
        SearchCfg {
            workers: self.workers.unwrap_or(base.workers),
            trials_per_worker: self.trials.unwrap_or(base.trials_per_worker),
            seed: self.seed.or(base.seed),
            climb: ClimbCfg {
                initial: ValueDomain::new(
                    self.initial_min.unwrap_or(climb.initial.min),
                    self.initial_max.unwrap_or(climb.initial.max),
                ),
                candidates: ValueDomain::new(
                    self.candidate_min.unwrap_or(climb.candidates.min),
                    self.candidate_max.unwrap_or(climb.candidates.max),
                ),
            },
        }
    }
}
