use super::event::LABEL_COLUMN;
use crate::data::BarSeries;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Class balance of a labeled table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelReport {
    pub distribution: BTreeMap<i64, f64>,
    pub counts: BTreeMap<i64, usize>,
    pub total_samples: usize,
    pub num_classes: usize,
}

impl LabelReport {
    pub fn minority_share(&self) -> Option<f64> {
        self.distribution.values().copied().reduce(f64::min)
    }
}

/// Relative frequency of each label value.
///
/// Advisory only: an empty table, a missing `label` column or a non-integer
/// one yields a report with zero classes instead of an error. Null labels are
/// not counted as a class but still count toward `total_samples`.
pub fn validate_labels(series: &BarSeries) -> LabelReport {
    let total = series.len();
    let labels = match label_values(series) {
        Some(values) => values,
        None => {
            log::warn!("No usable '{}' column; reporting zero classes", LABEL_COLUMN);
            return LabelReport {
                total_samples: total,
                ..LabelReport::default()
            };
        }
    };

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for label in labels.into_iter().flatten() {
        *counts.entry(label).or_insert(0) += 1;
    }

    let distribution = counts
        .iter()
        .map(|(&label, &count)| (label, count as f64 / total as f64))
        .collect();

    LabelReport {
        distribution,
        num_classes: counts.len(),
        counts,
        total_samples: total,
    }
}

fn label_values(series: &BarSeries) -> Option<Vec<Option<i64>>> {
    let column = series.frame().column(LABEL_COLUMN).ok()?;
    if !column.dtype().is_integer() {
        return None;
    }
    let cast = column.cast(&DataType::Int64).ok()?;
    let values = cast.i64().ok()?.into_iter().collect();
    Some(values)
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
        let df = DataFrame::new(vec![
            timestamp_series("timestamp", &times).unwrap().into_column(),
            Column::new(LABEL_COLUMN.into(), labels.to_vec()),
        ])
        .unwrap();
        BarSeries::new(df, "timestamp").unwrap()
    }

    #[test]
    fn test_distribution() {
        let report = validate_labels(&labeled(&[1, 0, 0, 1, 0]));
        assert_eq!(report.total_samples, 5);
        assert_eq!(report.num_classes, 2);
        assert_eq!(report.counts[&0], 3);
        assert!((report.distribution[&0] - 0.6).abs() < 1e-12);
        assert!((report.distribution[&1] - 0.4).abs() < 1e-12);
        assert_eq!(report.minority_share(), Some(0.4));
    }

    #[test]
    fn test_empty_input_is_degenerate() {
        let report = validate_labels(&labeled(&[]));
        assert_eq!(report.total_samples, 0);
        assert_eq!(report.num_classes, 0);
        assert!(report.distribution.is_empty());
        assert_eq!(report.minority_share(), None);
    }
}
