use crate::config::WalkForwardConfig;
use crate::data::BarSeries;
use crate::error::Result;
use crate::splitters::{DataSplit, DataSplitter, FoldWindow, WalkForwardSplitter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold_num: usize,
    pub window: Option<FoldWindow>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardReport {
    pub method: String,
    pub folds: Vec<FoldResult>,
    pub aggregate_metrics: BTreeMap<String, f64>,
}

/// Drives a per-fold evaluation over walk-forward splits, in fold order.
pub struct WalkForwardRunner {
    splitter: WalkForwardSplitter,
}

impl WalkForwardRunner {
    pub fn new(config: WalkForwardConfig) -> Self {
        Self {
            splitter: WalkForwardSplitter::new(config),
        }
    }

    pub fn run<F>(&self, series: &BarSeries, mut evaluate: F) -> Result<WalkForwardReport>
    where
        F: FnMut(&DataSplit) -> Result<HashMap<String, f64>>,
    {
        log::info!("Starting walk-forward validation...");
        let splits = self.splitter.split(series)?;

        let mut folds = Vec::with_capacity(splits.len());
        for split in &splits {
            log::info!(
                "Fold {}/{}: Train {}, Test {}",
                split.fold_num + 1,
                splits.len(),
                split.train.len(),
                split.test.len()
            );

            let metrics = evaluate(split)?;
            folds.push(FoldResult {
                fold_num: split.fold_num,
                window: split.window,
                train_rows: split.train.len(),
                test_rows: split.test.len(),
                metrics,
            });
        }

        log::info!("Walk-forward complete: {} folds", folds.len());
        Ok(WalkForwardReport {
            method: self.splitter.name().to_string(),
            aggregate_metrics: aggregate_metrics(&folds),
            folds,
        })
    }
}

/// `{metric}_mean/_std/_min/_max` over the folds reporting each metric.
fn aggregate_metrics(folds: &[FoldResult]) -> BTreeMap<String, f64> {
    let mut by_metric: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for fold in folds {
        for (name, value) in &fold.metrics {
            by_metric.entry(name.as_str()).or_default().push(*value);
        }
    }

    let mut aggregated = BTreeMap::new();
    for (name, values) in by_metric {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        aggregated.insert(format!("{}_mean", name), mean);
        aggregated.insert(format!("{}_std", name), calculate_std(&values, mean));
        aggregated.insert(
            format!("{}_min", name),
            values.iter().copied().fold(f64::INFINITY, f64::min),
        );
        aggregated.insert(
            format!("{}_max", name),
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        );
    }

    aggregated
}

fn calculate_std(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}
