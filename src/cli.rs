//! Command-line definition and dispatch.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{AppConfig, ConfigManager};
use crate::error::ChronolabelError;
use crate::{logging, pipeline};

/// Exit status for a detected leak, distinct from ordinary failures.
pub const LEAKAGE_EXIT_CODE: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "chronolabel",
    about = "Triple-barrier labeling and leakage-safe splits for bar data"
)]
pub struct Cli {
    /// TOML config file; `CHRONOLABEL__SECTION__KEY` variables override it,
    /// or the defaults when no file is given
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Label bars with the triple-barrier method and write them out
    Label {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Undersample to equal class counts before writing
        #[arg(long)]
        balance: bool,
        /// Write the label run summary as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show the purged train/test boundaries for a bar file
    Split {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// List walk-forward folds and per-fold row metrics
    WalkForward {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Check a derived table against its source for look-ahead leakage
    CheckLeakage {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        derived: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    logging::init(&cli.log_level);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Command::Label {
            input,
            output,
            balance,
            report,
        } => run_label(&config, &input, &output, balance, report.as_deref()),
        Command::Split { input } => run_split(&config, &input),
        Command::WalkForward { input, report } => {
            run_walk_forward(&config, &input, report.as_deref())
        }
        Command::CheckLeakage { source, derived } => run_check_leakage(&config, &source, &derived),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            match e.downcast_ref::<ChronolabelError>() {
                Some(ChronolabelError::Leakage { .. }) => ExitCode::from(LEAKAGE_EXIT_CODE),
                _ => ExitCode::from(1),
            }
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let manager = ConfigManager::new();
    match path {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => manager
            .load_from_env()
            .context("loading config from environment")?,
    }
    Ok(manager.get())
}

fn run_label(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    balance: bool,
    report: Option<&Path>,
) -> anyhow::Result<()> {
    let out = pipeline::build_labels(config, input, output, balance)?;

    eprintln!(
        "Labeled {} of {} bars: {} long, {} short/none, {} skipped",
        out.stats.evaluated_count,
        out.quality.rows,
        out.stats.long_count,
        out.stats.short_count,
        out.stats.skipped_count
    );
    for (label, share) in &out.labels.distribution {
        eprintln!("  label {label}: {:.1}%", share * 100.0);
    }
    if !out.quality.passed() {
        eprintln!("warning: {} data quality issue(s)", out.quality.issues.len());
    }

    if let Some(path) = report {
        write_json(path, &out)?;
    }
    Ok(())
}

fn run_split(config: &AppConfig, input: &Path) -> anyhow::Result<()> {
    let (series, _) = pipeline::load_series(config, input)?;
    let split = pipeline::purged_split(config, &series)?;

    println!(
        "train rows {}..{} ({}), test rows {}..{} ({}), gap {}",
        split.train_rows.start,
        split.train_rows.end,
        split.train.len(),
        split.test_rows.start,
        split.test_rows.end,
        split.test.len(),
        split.gap_rows()
    );
    if let (Some(train_end), Some(test_start)) = (split.train_end(), split.test_start()) {
        println!("train ends {train_end}, test starts {test_start}");
    }
    Ok(())
}

fn run_walk_forward(config: &AppConfig, input: &Path, report: Option<&Path>) -> anyhow::Result<()> {
    let (series, _) = pipeline::load_series(config, input)?;
    let wf = pipeline::walk_forward(config, &series)?;

    if wf.folds.is_empty() {
        eprintln!("warning: series too short for a single walk-forward fold");
    }
    for fold in &wf.folds {
        match fold.window {
            Some(w) => println!(
                "fold {}: train {} -> {} ({} rows), test {} -> {} ({} rows)",
                fold.fold_num,
                w.train_start,
                w.train_end,
                fold.train_rows,
                w.test_start,
                w.test_end,
                fold.test_rows
            ),
            None => println!(
                "fold {}: {} train rows, {} test rows",
                fold.fold_num, fold.train_rows, fold.test_rows
            ),
        }
    }

    if let Some(path) = report {
        write_json(path, &wf)?;
    }
    Ok(())
}

fn run_check_leakage(config: &AppConfig, source: &Path, derived: &Path) -> anyhow::Result<()> {
    let reports = pipeline::check_leakage(config, source, derived)?;
    for report in &reports {
        println!(
            "{}: {} column(s) checked, {} all-missing",
            report.check,
            report.checked_columns.len(),
            report.all_missing.len()
        );
    }
    println!("No leakage detected");
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
