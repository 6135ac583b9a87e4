//! End-to-end runs wired from [`AppConfig`], used by the `chronolabel` binary.

use crate::config::AppConfig;
use crate::data::{BarSeries, CsvConnector, DataQualityReport, DataValidator};
use crate::error::Result;
use crate::evaluation::{WalkForwardReport, WalkForwardRunner};
use crate::ml::labeling::{
    validate_labels, LabelBalancer, LabelReport, LabelStats, TripleBarrierLabeler, LABEL_COLUMN,
};
use crate::splitters::{DataSplit, DataSplitter, PurgedSplitter};
use crate::validation::{LeakageGuard, LeakageReport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelPipelineOutput {
    pub quality: DataQualityReport,
    pub stats: LabelStats,
    pub labels: LabelReport,
    pub balanced: bool,
    pub rows_written: usize,
}

/// Load bars with advisory data-quality checks, then enforce ordering.
pub fn load_series(config: &AppConfig, path: &Path) -> Result<(BarSeries, DataQualityReport)> {
    let frame = CsvConnector::normalize_columns(CsvConnector::load_frame(path)?)?;
    let quality = DataValidator::run_full_validation(&frame, &config.data)?;
    let series = BarSeries::new(frame, &config.data.timestamp_col)?;
    log::info!("Loaded {} bars from {}", series.len(), path.display());
    Ok((series, quality))
}

/// Label bars, optionally balance classes, and write the labeled table.
pub fn build_labels(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    balance: bool,
) -> Result<LabelPipelineOutput> {
    log::info!("PIPELINE: Build Labels");
    let (series, quality) = load_series(config, input)?;

    let run = TripleBarrierLabeler::new(config.labeling.clone()).run(&series)?;
    LeakageGuard::new().validate(&series, &run.labeled)?;

    let labeled = if balance {
        LabelBalancer::new(config.balance.clone()).balance(&run.labeled)?
    } else {
        run.labeled
    };
    let labels = validate_labels(&labeled);

    CsvConnector::write(output, &labeled)?;
    log::info!("Labels built: {} samples -> {}", labeled.len(), output.display());

    Ok(LabelPipelineOutput {
        quality,
        stats: run.stats,
        labels,
        balanced: balance,
        rows_written: labeled.len(),
    })
}

pub fn purged_split(config: &AppConfig, series: &BarSeries) -> Result<DataSplit> {
    let mut splits = PurgedSplitter::new(config.split.clone()).split(series)?;
    Ok(splits.remove(0))
}

/// Walk-forward folds with row counts, plus the test-window long share when
/// the series carries labels.
pub fn walk_forward(config: &AppConfig, series: &BarSeries) -> Result<WalkForwardReport> {
    let runner = WalkForwardRunner::new(config.walk_forward.clone());
    runner.run(series, |split| {
        let mut metrics = HashMap::new();
        metrics.insert("train_rows".to_string(), split.train.len() as f64);
        metrics.insert("test_rows".to_string(), split.test.len() as f64);

        if split.test.has_column(LABEL_COLUMN) {
            let report = validate_labels(&split.test);
            if let Some(share) = report.distribution.get(&1) {
                metrics.insert("test_long_share".to_string(), *share);
            }
        }
        Ok(metrics)
    })
}

pub fn check_leakage(
    config: &AppConfig,
    source: &Path,
    derived: &Path,
) -> Result<Vec<LeakageReport>> {
    let source = CsvConnector::load(source, &config.data.timestamp_col)?;
    let derived = CsvConnector::load(derived, &config.data.timestamp_col)?;
    LeakageGuard::new().validate(&source, &derived)
}
