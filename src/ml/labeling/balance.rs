use super::event::LABEL_COLUMN;
use crate::config::{BalanceConfig, BalanceMethod};
use crate::data::BarSeries;
use crate::error::{ChronolabelError, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Class balancing for training subsets.
///
/// The output is a strict subset of the input rows in chronological order,
/// so it is no longer a contiguous series. Split first, then balance the
/// train partition; never split a balanced table.
pub struct LabelBalancer {
    config: BalanceConfig,
}

impl LabelBalancer {
    pub fn new(config: BalanceConfig) -> Self {
        Self { config }
    }

    pub fn balance(&self, series: &BarSeries) -> Result<BarSeries> {
        match self.config.method {
            BalanceMethod::Undersample => self.undersample(series),
        }
    }

    /// Downsample every class to the smallest class count. Rows with a null
    /// label are dropped.
    fn undersample(&self, series: &BarSeries) -> Result<BarSeries> {
        let column = series
            .frame()
            .column(LABEL_COLUMN)
            .map_err(|_| ChronolabelError::MissingColumn(LABEL_COLUMN.to_string()))?;
        let labels = column.cast(&DataType::Int64)?;

        let mut classes: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (row, label) in labels.i64()?.into_iter().enumerate() {
            if let Some(label) = label {
                classes.entry(label).or_default().push(row);
            }
        }

        let Some(min_count) = classes.values().map(Vec::len).min() else {
            log::warn!("Nothing to balance: no labeled rows");
            return Ok(series.slice(0..0));
        };

        // One generator, classes visited in ascending label order.
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut keep: Vec<usize> = Vec::with_capacity(min_count * classes.len());
        for rows in classes.values() {
            let picked = rand::seq::index::sample(&mut rng, rows.len(), min_count);
            keep.extend(picked.into_iter().map(|i| rows[i]));
        }
        keep.sort_unstable();

        let balanced = series.take_rows(&keep)?;
        log::info!(
            "Balanced dataset: {} samples ({} per class, seed {})",
            balanced.len(),
            min_count,
            self.config.seed
        );
        Ok(balanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timestamp_series;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn labeled(labels: &[i32]) -> BarSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let times: Vec<DateTime<Utc>> = (0..labels.len())
            .map(|i| start + Duration::minutes(5 * i as i64))
            .collect();
        let row_id: Vec<i64> = (0..labels.len() as i64).collect();
        let df = DataFrame::new(vec![
            timestamp_series("timestamp", &times).unwrap().into_column(),
            Column::new("row_id".into(), row_id),
            Column::new(LABEL_COLUMN.into(), labels.to_vec()),
        ])
        .unwrap();
        BarSeries::new(df, "timestamp").unwrap()
    }

    fn balancer(seed: u64) -> LabelBalancer {
        LabelBalancer::new(BalanceConfig {
            method: BalanceMethod::Undersample,
            seed,
        })
    }

    fn row_ids(series: &BarSeries) -> Vec<i64> {
        series
            .frame()
            .column("row_id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_undersample_equalises_classes() {
        let labels: Vec<i32> = (0..40).map(|i| if i % 4 == 0 { 1 } else { 0 }).collect();
        let balanced = balancer(42).balance(&labeled(&labels)).unwrap();

        let report = crate::ml::labeling::validate_labels(&balanced);
        assert_eq!(report.counts[&0], 10);
        assert_eq!(report.counts[&1], 10);
    }

    #[test]
    fn test_subset_without_duplicates_in_time_order() {
        let labels: Vec<i32> = (0..60).map(|i| (i % 3 == 0) as i32).collect();
        let balanced = balancer(7).balance(&labeled(&labels)).unwrap();

        let ids = row_ids(&balanced);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| (0..60).contains(id)));
        assert!(balanced.timestamps().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_seed_same_rows() {
        let labels: Vec<i32> = (0..100).map(|i| (i % 5 < 2) as i32).collect();
        let series = labeled(&labels);

        let first = balancer(42).balance(&series).unwrap();
        let second = balancer(42).balance(&series).unwrap();
        assert!(first.frame().equals(second.frame()));
    }

    #[test]
    fn test_empty_and_missing_label() {
        let empty = balancer(1).balance(&labeled(&[])).unwrap();
        assert!(empty.is_empty());

        let series = labeled(&[1, 0]);
        let unlabeled = BarSeries::new(
            series.frame().drop(LABEL_COLUMN).unwrap(),
            "timestamp",
        )
        .unwrap();
        assert!(matches!(
            balancer(1).balance(&unlabeled),
            Err(ChronolabelError::MissingColumn(_))
        ));
    }
}
