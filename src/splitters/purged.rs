use super::base::DataSplitter;
use super::types::DataSplit;
use crate::config::{ConfigSection, SplitConfig};
use crate::data::BarSeries;
use crate::error::Result;

/// Single temporal split with a purge gap before the boundary and an embargo
/// gap after it.
///
/// With `split_idx = floor(n * (1 - test_size))`, train is `[0, split_idx - purge)`
/// and test is `[split_idx + embargo, n)`, so at least `purge + embargo` rows
/// separate the two partitions. Oversized gaps yield empty partitions rather
/// than errors.
pub struct PurgedSplitter {
    config: SplitConfig,
}

impl PurgedSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Row ranges for a series of length `n`.
    pub fn boundaries(&self, n: usize) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let split_idx = ((n as f64) * (1.0 - self.config.test_size)).floor() as usize;
        let split_idx = split_idx.min(n);

        let train_end = split_idx.saturating_sub(self.config.purge_bars);
        let test_start = split_idx.saturating_add(self.config.embargo_bars).min(n);

        (0..train_end, test_start..n)
    }
}

impl DataSplitter for PurgedSplitter {
    fn split(&self, series: &BarSeries) -> Result<Vec<DataSplit>> {
        self.config.validate()?;

        let (train_rows, test_rows) = self.boundaries(series.len());
        let train = series.slice(train_rows.clone());
        let test = series.slice(test_rows.clone());

        log::info!("Train: {} rows, Test: {} rows", train.len(), test.len());
        log::info!(
            "Purged: {} bars, Embargoed: {} bars",
            self.config.purge_bars,
            self.config.embargo_bars
        );
        if train.is_empty() || test.is_empty() {
            log::warn!("Purge/embargo left an empty partition");
        }

        Ok(vec![DataSplit {
            train,
            test,
            fold_num: 0,
            train_rows,
            test_rows,
            window: None,
        }])
    }

    fn name(&self) -> &str {
        "Purged Train/Test Split"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(test_size: f64, purge_bars: usize, embargo_bars: usize) -> PurgedSplitter {
        PurgedSplitter::new(SplitConfig {
            test_size,
            purge_bars,
            embargo_bars,
        })
    }

    #[test]
    fn test_boundaries_with_purge_and_embargo() {
        let (train, test) = splitter(0.2, 5, 5).boundaries(1000);
        assert_eq!(train, 0..795);
        assert_eq!(test, 805..1000);
    }

    #[test]
    fn test_boundaries_without_gaps() {
        let (train, test) = splitter(0.3, 0, 0).boundaries(10);
        assert_eq!(train, 0..7);
        assert_eq!(test, 7..10);
    }

    #[test]
    fn test_oversized_gaps_give_empty_partitions() {
        let (train, test) = splitter(0.2, 50, 0).boundaries(20);
        assert!(train.is_empty());
        assert_eq!(test, 16..20);

        let (train, test) = splitter(0.2, 0, 50).boundaries(20);
        assert_eq!(train, 0..16);
        assert!(test.is_empty());
    }
}
