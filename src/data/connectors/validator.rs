use super::types::{DataIssue, DataQualityReport, RequiredColumn};
use crate::config::DataConfig;
use crate::error::{ChronolabelError, Result};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

/// Data-quality checks on raw bar frames.
///
/// Everything except the OHLC column presence check is advisory: findings are
/// logged and collected into a [`DataQualityReport`], never raised.
pub struct DataValidator;

impl DataValidator {
    /// Validate that DataFrame has required OHLC columns
    pub fn validate_ohlc(df: &DataFrame) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(ChronolabelError::MissingColumn(format!(
                        "{} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        for (req_col, actual_name) in &column_map {
            let column = df.column(actual_name)?;
            if !matches!(
                column.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(ChronolabelError::Validation(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    req_col.as_str(),
                    column.dtype()
                )));
            }
        }

        Ok(column_map)
    }

    pub(crate) fn find_column(df: &DataFrame, required: &RequiredColumn) -> Option<&'static str> {
        let columns = df.get_column_names();
        required
            .aliases()
            .iter()
            .find(|&&alias| columns.iter().any(|col| col.as_str() == alias))
            .copied()
    }

    pub fn check_missing_values(df: &DataFrame) -> Vec<(String, usize)> {
        let missing: Vec<(String, usize)> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect();

        if !missing.is_empty() {
            log::warn!("Missing values found: {:?}", missing);
        }
        missing
    }

    /// Number of rows whose timestamp repeats an earlier row's.
    pub fn check_duplicates(df: &DataFrame, timestamp_col: &str) -> Result<usize> {
        let raw = Self::raw_timestamps(df, timestamp_col)?;
        let mut seen = HashSet::with_capacity(raw.len());
        let dup_count = raw.iter().flatten().filter(|ts| !seen.insert(**ts)).count();

        if dup_count > 0 {
            log::warn!("Found {} duplicate timestamps", dup_count);
        }
        Ok(dup_count)
    }

    pub fn check_monotonic_time(df: &DataFrame, timestamp_col: &str) -> Result<bool> {
        let raw = Self::raw_timestamps(df, timestamp_col)?;
        let is_monotonic = raw.windows(2).all(|w| match (w[0], w[1]) {
            (Some(a), Some(b)) => a <= b,
            _ => false,
        });

        if !is_monotonic {
            log::error!("Time index is not monotonically increasing!");
        }
        Ok(is_monotonic)
    }

    /// Z-score outliers per column, skipping columns that are absent.
    pub fn check_outliers(
        df: &DataFrame,
        columns: &[&str],
        threshold: f64,
    ) -> Result<Vec<(String, usize)>> {
        let mut outliers = Vec::new();

        for &name in columns {
            let Ok(column) = df.column(name) else {
                continue;
            };
            let cast = column.cast(&DataType::Float64)?;
            let values: Vec<f64> = cast
                .f64()?
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .collect();
            if values.len() < 2 {
                continue;
            }

            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
            let std = variance.sqrt();
            if std == 0.0 {
                continue;
            }

            let count = values
                .iter()
                .filter(|v| ((*v - mean) / std).abs() > threshold)
                .count();
            if count > 0 {
                log::warn!("{}: {} outliers (z > {})", name, count, threshold);
                outliers.push((name.to_string(), count));
            }
        }

        Ok(outliers)
    }

    /// Counts rows violating high >= max(open, close), low <= min(open, close)
    /// and high >= low.
    pub fn check_ohlc_logic(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let column_map = Self::validate_ohlc(df)?;
        let values = |col: RequiredColumn| -> Result<Vec<Option<f64>>> {
            let cast = df.column(&column_map[&col])?.cast(&DataType::Float64)?;
            Ok(cast.f64()?.into_iter().collect())
        };
        let open = values(RequiredColumn::Open)?;
        let high = values(RequiredColumn::High)?;
        let low = values(RequiredColumn::Low)?;
        let close = values(RequiredColumn::Close)?;

        let (mut invalid_high, mut invalid_low, mut invalid_range) = (0, 0, 0);
        for i in 0..df.height() {
            if let (Some(o), Some(h), Some(l), Some(c)) = (open[i], high[i], low[i], close[i]) {
                if h < o.max(c) {
                    invalid_high += 1;
                }
                if l > o.min(c) {
                    invalid_low += 1;
                }
                if h < l {
                    invalid_range += 1;
                }
            }
        }

        let errors: Vec<(String, usize)> = [
            ("High < max(open, close)", invalid_high),
            ("Low > min(open, close)", invalid_low),
            ("High < Low", invalid_range),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(rule, count)| (rule.to_string(), count))
        .collect();

        for (rule, count) in &errors {
            log::error!("OHLC validation failed: {}: {} rows", rule, count);
        }
        Ok(errors)
    }

    /// Run the full advisory suite. Only a missing OHLC or timestamp column fails.
    pub fn run_full_validation(df: &DataFrame, config: &DataConfig) -> Result<DataQualityReport> {
        log::info!("Running full data validation...");
        let mut issues = Vec::new();

        for (column, count) in Self::check_missing_values(df) {
            issues.push(DataIssue::MissingValues { column, count });
        }

        let dup_count = Self::check_duplicates(df, &config.timestamp_col)?;
        if dup_count > 0 {
            issues.push(DataIssue::DuplicateTimestamps { count: dup_count });
        }

        if !Self::check_monotonic_time(df, &config.timestamp_col)? {
            issues.push(DataIssue::NonMonotonicTime);
        }

        let column_map = Self::validate_ohlc(df)?;
        let ohlc_names: Vec<&str> = RequiredColumn::all()
            .iter()
            .map(|col| column_map[col].as_str())
            .collect();
        for (column, count) in Self::check_outliers(df, &ohlc_names, config.outlier_threshold)? {
            issues.push(DataIssue::Outliers {
                column,
                count,
                threshold: config.outlier_threshold,
            });
        }

        for (rule, count) in Self::check_ohlc_logic(df)? {
            issues.push(DataIssue::OhlcLogic { rule, count });
        }

        if df.height() < config.min_rows {
            log::error!(
                "Insufficient data: {} rows < {} required",
                df.height(),
                config.min_rows
            );
            issues.push(DataIssue::InsufficientRows {
                rows: df.height(),
                minimum: config.min_rows,
            });
        }

        let report = DataQualityReport {
            rows: df.height(),
            issues,
        };
        if report.passed() {
            log::info!("All validation checks passed");
        } else {
            log::warn!("{} data validation checks failed", report.issues.len());
        }
        Ok(report)
    }

    fn raw_timestamps(df: &DataFrame, timestamp_col: &str) -> Result<Vec<Option<i64>>> {
        let column = df.column(timestamp_col).map_err(|_| {
            ChronolabelError::MissingColumn(format!("timestamp column '{}'", timestamp_col))
        })?;
        let physical = column.cast(&DataType::Int64)?;
        Ok(physical.i64()?.into_iter().collect())
    }
}
