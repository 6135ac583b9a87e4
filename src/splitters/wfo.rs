use super::base::DataSplitter;
use super::types::{DataSplit, FoldWindow, WindowType};
use crate::config::{ConfigSection, WalkForwardConfig};
use crate::data::BarSeries;
use crate::error::Result;
use chrono::{DateTime, Duration, Months, Utc};
use rayon::prelude::*;

/// Calendar walk-forward folds.
///
/// Each fold trains on `[train_start, train_start + train_months)` and tests on
/// the following `test_weeks`; the cursor then advances by `step_weeks`. Folds
/// whose test window would run past the last bar are never produced, and folds
/// with an empty train or test mask are dropped.
pub struct WalkForwardSplitter {
    config: WalkForwardConfig,
}

impl WalkForwardSplitter {
    pub fn new(config: WalkForwardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkForwardConfig {
        &self.config
    }

    /// Fold boundaries for data spanning `[start, end]`, before any masking.
    pub fn windows(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<FoldWindow> {
        let mut windows = Vec::new();
        let (Some(step), Some(test_len)) = (
            Duration::try_weeks(i64::from(self.config.step_weeks)),
            Duration::try_weeks(i64::from(self.config.test_weeks)),
        ) else {
            return windows;
        };
        let train_len = Months::new(self.config.train_months);

        let mut cursor = start;

        loop {
            let Some(train_end) = cursor.checked_add_months(train_len) else {
                break;
            };
            let test_start = train_end;
            let Some(test_end) = test_start.checked_add_signed(test_len) else {
                break;
            };

            if test_end > end {
                break;
            }

            let train_start = match self.config.window {
                WindowType::Rolling => cursor,
                WindowType::Anchored => start,
            };
            windows.push(FoldWindow {
                train_start,
                train_end,
                test_start,
                test_end,
            });

            let Some(next) = cursor.checked_add_signed(step) else {
                break;
            };
            cursor = next;
        }

        windows
    }

    fn extract(series: &BarSeries, window: &FoldWindow) -> Option<DataSplit> {
        let timestamps = series.timestamps();
        let row_at = |bound: DateTime<Utc>| timestamps.partition_point(|ts| *ts < bound);

        let train_rows = row_at(window.train_start)..row_at(window.train_end);
        let test_rows = row_at(window.test_start)..row_at(window.test_end);
        if train_rows.is_empty() || test_rows.is_empty() {
            log::debug!(
                "Dropping fold {} -> {}: empty train or test mask",
                window.train_start,
                window.test_end
            );
            return None;
        }

        Some(DataSplit {
            train: series.slice(train_rows.clone()),
            test: series.slice(test_rows.clone()),
            fold_num: 0,
            train_rows,
            test_rows,
            window: Some(*window),
        })
    }
}

impl DataSplitter for WalkForwardSplitter {
    fn split(&self, series: &BarSeries) -> Result<Vec<DataSplit>> {
        self.config.validate()?;

        let (Some(start), Some(end)) = (series.first_timestamp(), series.last_timestamp()) else {
            log::info!("Generated 0 walk-forward splits (empty series)");
            return Ok(Vec::new());
        };

        let windows = self.windows(start, end);
        let extracted: Vec<Option<DataSplit>> = windows
            .par_iter()
            .map(|window| Self::extract(series, window))
            .collect();

        let splits: Vec<DataSplit> = extracted
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(fold_num, split)| DataSplit { fold_num, ..split })
            .collect();

        log::info!(
            "Generated {} walk-forward splits from {} candidate windows",
            splits.len(),
            windows.len()
        );
        Ok(splits)
    }

    fn name(&self) -> &str {
        match self.config.window {
            WindowType::Rolling => "Rolling Walk-Forward",
            WindowType::Anchored => "Anchored Walk-Forward",
        }
    }
}
