//! Result sink for the CLI and the JSON artifact it writes.

use anyhow::{bail, Context, Result};
use magic::prelude::{CollectingSink, Grid, ResultSink, SearchSummary, Solution};
use serde_json::{json, Value};
use std::path::Path;

/// Logs and prints every accepted solution, then keeps it for the artifact.
#[derive(Default)]
pub struct LoggingSink {
    collected: CollectingSink,
    quiet: bool,
}

impl LoggingSink {
    pub fn new(quiet: bool) -> Self {
        Self {
            collected: CollectingSink::new(),
            quiet,
        }
    }

    pub fn into_solutions(self) -> Vec<Solution> {
        self.collected.into_solutions()
    }
}

impl ResultSink for LoggingSink {
    fn publish(&self, solution: &Solution) {
        tracing::info!(
            combinations = solution.combinations,
            symmetry_pairs = solution.symmetry_pairs,
            grid = ?solution.grid,
            "solution"
        );
        if !self.quiet {
            println!("{solution}");
        }
        self.collected.publish(solution);
    }
}

pub fn solution_json(s: &Solution) -> Value {
    json!({
        "error": s.error,
        "combinations": s.combinations,
        "symmetry_pairs": s.symmetry_pairs,
        "grid": s.grid.to_vec(),
    })
}

pub fn summary_json(s: &SearchSummary) -> Value {
    json!({
        "best": {
            "symmetry_pairs": s.best.symmetry_pairs,
            "combinations": s.best.combinations,
        },
        "workers": s.workers,
        "trials": s.trials,
        "exact_solutions": s.exact_solutions,
        "published": s.published,
        "base_seed": s.base_seed,
    })
}

/// Write summary plus solutions (in acceptance order) as pretty JSON.
pub fn write_results(path: &Path, summary: &SearchSummary, solutions: &[Solution]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let doc = json!({
        "summary": summary_json(summary),
        "solutions": solutions.iter().map(solution_json).collect::<Vec<_>>(),
    });
    std::fs::write(path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Parse 16 integers separated by commas and/or whitespace, brackets optional.
pub fn parse_grid(text: &str) -> Result<Grid> {
    let values = text
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<i32>()
                .with_context(|| format!("bad grid value '{t}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    let n = values.len();
    let Ok(grid) = Grid::try_from(values) else {
        bail!("grid needs 16 values, got {n}");
    };
    if let Some(v) = grid.iter().find(|v| !(0..64).contains(*v)) {
        bail!("grid value {v} outside 0..=63");
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic::prelude::{BestRecord, REFERENCE_GRID};
    use tempfile::tempdir;

    #[test]
    fn parses_go_style_and_csv_grids() {
        let csv = "1,14,14,4,11,7,6,9,8,10,10,5,13,2,3,15";
        assert_eq!(parse_grid(csv).unwrap(), REFERENCE_GRID);
        let spaced = "[1 14 14 4 11 7 6 9 8 10 10 5 13 2 3 15]";
        assert_eq!(parse_grid(spaced).unwrap(), REFERENCE_GRID);
    }

    #[test]
    fn rejects_short_or_out_of_range_grids() {
        assert!(parse_grid("1,2,3").is_err());
        assert!(parse_grid("1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,x").is_err());
        assert!(parse_grid("1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,99").is_err());
    }

    #[test]
    fn writes_results_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/solutions.json");
        let solution = Solution {
            error: 0,
            combinations: 323,
            symmetry_pairs: 122,
            grid: [13, 7, 2, 11, 3, 5, 10, 15, 9, 4, 14, 6, 8, 17, 7, 1],
        };
        let summary = SearchSummary {
            best: BestRecord {
                symmetry_pairs: 122,
                combinations: 323,
            },
            workers: 2,
            trials: 100,
            exact_solutions: 1,
            published: 1,
            base_seed: 9,
        };
        write_results(&path, &summary, std::slice::from_ref(&solution)).unwrap();
        let doc: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["summary"]["best"]["symmetry_pairs"], 122);
        assert_eq!(doc["solutions"][0]["grid"][13], 17);
        assert_eq!(doc["solutions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn logging_sink_collects_in_order() {
        let sink = LoggingSink::new(true);
        for c in [10, 20] {
            sink.publish(&Solution {
                error: 0,
                combinations: c,
                symmetry_pairs: 1,
                grid: REFERENCE_GRID,
            });
        }
        let got: Vec<usize> = sink.into_solutions().iter().map(|s| s.combinations).collect();
        assert_eq!(got, vec![10, 20]);
    }
}
