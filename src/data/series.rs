use crate::error::{ChronolabelError, Result};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use std::ops::Range;

pub const DEFAULT_TIMESTAMP_COLUMN: &str = "timestamp";

/// Time-indexed table of bars.
///
/// Wraps a polars `DataFrame` whose timestamp column is a non-null `Datetime`
/// in strictly increasing order. The check runs once at construction; every
/// series derived through [`BarSeries::slice`] or [`BarSeries::take_rows`]
/// keeps the guarantee without re-validating.
#[derive(Debug, Clone)]
pub struct BarSeries {
    frame: DataFrame,
    timestamp_col: String,
    timestamps: Vec<DateTime<Utc>>,
}

impl BarSeries {
    pub fn new(frame: DataFrame, timestamp_col: &str) -> Result<Self> {
        let column = frame.column(timestamp_col).map_err(|_| {
            ChronolabelError::MissingColumn(format!("timestamp column '{}'", timestamp_col))
        })?;
        let timestamps = extract_timestamps(column)?;

        if let Some(pos) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            let (prev, next) = (timestamps[pos], timestamps[pos + 1]);
            let kind = if prev == next { "duplicate" } else { "out-of-order" };
            return Err(ChronolabelError::Validation(format!(
                "{} timestamp at row {}: {} follows {}",
                kind,
                pos + 1,
                next,
                prev
            )));
        }

        Ok(Self {
            frame,
            timestamp_col: timestamp_col.to_string(),
            timestamps,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn timestamp_col(&self) -> &str {
        &self.timestamp_col
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame
            .get_column_names()
            .iter()
            .any(|col| col.as_str() == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|col| col.to_string())
            .collect()
    }

    /// Fails with `MissingColumn` naming every absent column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChronolabelError::MissingColumn(missing.join(", ")))
        }
    }

    /// Column values cast to `f64`, nulls preserved.
    pub fn f64_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| ChronolabelError::MissingColumn(name.to_string()))?;
        let cast = column.cast(&DataType::Float64)?;
        Ok(cast.f64()?.into_iter().collect())
    }

    /// Contiguous row range; out-of-bounds ends are clamped.
    pub fn slice(&self, rows: Range<usize>) -> Self {
        let end = rows.end.min(self.len());
        let start = rows.start.min(end);

        Self {
            frame: self.frame.slice(start as i64, end - start),
            timestamp_col: self.timestamp_col.clone(),
            timestamps: self.timestamps[start..end].to_vec(),
        }
    }

    /// Selects rows by position. Indices must be strictly increasing so the
    /// result stays time-ordered.
    pub fn take_rows(&self, rows: &[usize]) -> Result<Self> {
        if rows.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ChronolabelError::Validation(
                "row selection must be strictly increasing".to_string(),
            ));
        }
        if let Some(&last) = rows.last() {
            if last >= self.len() {
                return Err(ChronolabelError::Validation(format!(
                    "row {} out of bounds for series of length {}",
                    last,
                    self.len()
                )));
            }
        }

        let idx: Vec<IdxSize> = rows.iter().map(|&row| row as IdxSize).collect();
        let frame = self.frame.take(&IdxCa::from_vec("idx".into(), idx))?;
        let timestamps = rows.iter().map(|&row| self.timestamps[row]).collect();

        Ok(Self {
            frame,
            timestamp_col: self.timestamp_col.clone(),
            timestamps,
        })
    }

    /// Appends or replaces a column of the same height.
    pub fn with_column(mut self, series: Series) -> Result<Self> {
        if series.name().as_str() == self.timestamp_col {
            return Err(ChronolabelError::Validation(
                "cannot overwrite the timestamp column".to_string(),
            ));
        }
        self.frame.with_column(series)?;
        Ok(self)
    }
}

fn extract_timestamps(column: &Column) -> Result<Vec<DateTime<Utc>>> {
    let unit = match column.dtype() {
        DataType::Datetime(unit, _) => *unit,
        other => {
            return Err(ChronolabelError::Validation(format!(
                "timestamp column '{}' must be Datetime, found {:?}",
                column.name(),
                other
            )))
        }
    };

    let physical = column.cast(&DataType::Int64)?;
    physical
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let raw = value.ok_or_else(|| {
                ChronolabelError::Validation(format!("null timestamp at row {}", row))
            })?;
            datetime_from_epoch(raw, unit).ok_or_else(|| {
                ChronolabelError::Validation(format!("invalid timestamp {} at row {}", raw, row))
            })
        })
        .collect()
}

pub fn datetime_from_epoch(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    let per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let secs = value.div_euclid(per_second);
    let nanos = value.rem_euclid(per_second) * (1_000_000_000 / per_second);
    DateTime::<Utc>::from_timestamp(secs, nanos as u32)
}

/// Builds a millisecond `Datetime` series, used when assembling frames by hand.
pub fn timestamp_series(name: &str, timestamps: &[DateTime<Utc>]) -> Result<Series> {
    let millis: Vec<i64> = timestamps.iter().map(|ts| ts.timestamp_millis()).collect();
    let series = Series::new(name.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn frame_with_times(times: &[DateTime<Utc>]) -> DataFrame {
        let ts = timestamp_series("timestamp", times).unwrap();
        let close: Vec<f64> = (0..times.len()).map(|i| 100.0 + i as f64).collect();
        DataFrame::new(vec![ts.into_column(), Column::new("close".into(), close)]).unwrap()
    }

    fn minutes(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| start + Duration::minutes(5 * i as i64)).collect()
    }

    #[test]
    fn test_accepts_strictly_increasing() {
        let series = BarSeries::new(frame_with_times(&minutes(10)), "timestamp").unwrap();
        assert_eq!(series.len(), 10);
        assert_eq!(series.first_timestamp(), minutes(1).first().copied());
    }

    #[test]
    fn test_rejects_duplicate_timestamps() {
        let mut times = minutes(5);
        times[3] = times[2];
        let err = BarSeries::new(frame_with_times(&times), "timestamp").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_out_of_order_timestamps() {
        let mut times = minutes(5);
        times.swap(1, 2);
        let err = BarSeries::new(frame_with_times(&times), "timestamp").unwrap_err();
        assert!(err.to_string().contains("out-of-order"));
    }

    #[test]
    fn test_missing_timestamp_column() {
        let err = BarSeries::new(frame_with_times(&minutes(3)), "time").unwrap_err();
        assert!(matches!(err, ChronolabelError::MissingColumn(_)));
    }

    #[test]
    fn test_slice_clamps_and_keeps_timestamps() {
        let series = BarSeries::new(frame_with_times(&minutes(10)), "timestamp").unwrap();
        let tail = series.slice(7..50);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail.frame().height(), 3);
        assert_eq!(tail.timestamps()[0], series.timestamps()[7]);

        let empty = series.slice(12..20);
        assert!(empty.is_empty());
        assert_eq!(empty.frame().height(), 0);
    }

    #[test]
    fn test_take_rows_requires_increasing() {
        let series = BarSeries::new(frame_with_times(&minutes(10)), "timestamp").unwrap();
        assert!(series.take_rows(&[3, 1]).is_err());

        let picked = series.take_rows(&[1, 4, 8]).unwrap();
        let close = picked.f64_values("close").unwrap();
        assert_eq!(close, vec![Some(101.0), Some(104.0), Some(108.0)]);
    }

    #[test]
    fn test_epoch_conversion_units() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        let secs = expected.timestamp();
        assert_eq!(datetime_from_epoch(secs * 1_000, TimeUnit::Milliseconds), Some(expected));
        assert_eq!(datetime_from_epoch(secs * 1_000_000, TimeUnit::Microseconds), Some(expected));
        assert_eq!(
            datetime_from_epoch(secs * 1_000_000_000, TimeUnit::Nanoseconds),
            Some(expected)
        );
    }
}
