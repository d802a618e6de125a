use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use magic::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod config;
mod provenance;
mod results;

use config::RunSettings;
use provenance::Payload;
use results::LoggingSink;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Search for interesting 4x4 magic squares")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Race parallel hill climbers and print every improving exact solution
    Search {
        #[command(flatten)]
        settings: RunSettings,
        /// JSON file with run settings; flags override its fields
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write solutions and summary here (plus a provenance sidecar)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Do not echo solutions to stdout
        #[arg(long)]
        quiet: bool,
    },
    /// Score one grid (defaults to the reference square)
    Score {
        /// 16 comma- or space-separated values, row-major
        #[arg(long)]
        grid: Option<String>,
        #[arg(long, default_value = "standard")]
        masks: String,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Search {
            settings,
            config,
            out,
            quiet,
        } => search(settings, config, out, quiet),
        Action::Score { grid, masks } => score_grid(grid, masks),
        Action::Report => report(),
    }
}

fn search(
    flags: RunSettings,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let settings = match &config {
        Some(path) => flags.over(RunSettings::load(path)?),
        None => flags,
    };
    let geometry =
        Geometry::new(settings.geometry_cfg()?).context("building geometry tables")?;
    let cfg = settings.search_cfg();
    let mask_set = settings.mask_set()?;
    tracing::info!(
        workers = cfg.workers,
        trials = cfg.trials_per_worker,
        seed = ?cfg.seed,
        masks = %mask_set,
        line_groups = geometry.line_groups().len(),
        catalog = geometry.catalog().len(),
        "search"
    );

    let sink = LoggingSink::new(quiet);
    let summary = run_search(&geometry, &cfg, &sink).context("running search")?;
    tracing::info!(
        symmetry_pairs = summary.best.symmetry_pairs,
        combinations = summary.best.combinations,
        trials = summary.trials,
        exact = summary.exact_solutions,
        published = summary.published,
        base_seed = summary.base_seed,
        "done"
    );

    if let Some(out) = out {
        let solutions = sink.into_solutions();
        results::write_results(&out, &summary, &solutions)?;
        let params = serde_json::to_value(&settings)?;
        let prov = provenance::write_sidecar(
            &out,
            Payload::new(params).with_summary(results::summary_json(&summary)),
        )?;
        tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote results");
    }
    Ok(())
}

fn score_grid(grid: Option<String>, masks: String) -> Result<()> {
    let grid = match grid {
        Some(text) => results::parse_grid(&text)?,
        None => REFERENCE_GRID,
    };
    let masks: MaskSet = masks.parse().map_err(anyhow::Error::msg)?;
    let geometry = Geometry::new(GeometryCfg::default().with_masks(masks))
        .context("building geometry tables")?;
    let error = total_error(&geometry, &grid);
    let scored = score(&geometry, &grid);
    tracing::info!(
        grid = ?grid,
        structural = structural_error(&geometry, &grid),
        distinctness = distinctness_error(&geometry, &grid),
        %masks,
        "score"
    );
    println!("{error}");
    println!("{}", scored.combinations);
    println!("{}", scored.symmetry_pairs);
    Ok(())
}

fn report() -> Result<()> {
    let obj = provenance::block(serde_json::json!({}), Vec::new());
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
