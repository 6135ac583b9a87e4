use crate::data::BarSeries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One (train, test) pair over disjoint row ranges of the same series.
///
/// `train_rows` and `test_rows` are absolute row positions in the series the
/// split was taken from. Either partition may be empty when purge/embargo
/// consume it; callers check [`DataSplit::is_usable`] before fitting.
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub train: BarSeries,
    pub test: BarSeries,
    pub fold_num: usize,
    pub train_rows: Range<usize>,
    pub test_rows: Range<usize>,
    pub window: Option<FoldWindow>,
}

impl DataSplit {
    pub fn is_usable(&self) -> bool {
        !self.train.is_empty() && !self.test.is_empty()
    }

    pub fn train_end(&self) -> Option<DateTime<Utc>> {
        self.train.last_timestamp()
    }

    pub fn test_start(&self) -> Option<DateTime<Utc>> {
        self.test.first_timestamp()
    }

    /// Rows dropped between the last train row and the first test row.
    pub fn gap_rows(&self) -> usize {
        self.test_rows.start.saturating_sub(self.train_rows.end)
    }
}

/// Calendar bounds of a walk-forward fold; both ranges are half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldWindow {
    pub train_start: DateTime<Utc>,
    pub train_end: DateTime<Utc>,
    pub test_start: DateTime<Utc>,
    pub test_end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Train start and end both slide forward each fold
    #[default]
    Rolling,
    /// Train start stays at the series start; train end slides forward
    Anchored,
}
