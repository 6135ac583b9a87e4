use super::{types::RequiredColumn, validator::DataValidator};
use crate::data::series::BarSeries;
use crate::error::{ChronolabelError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame, parsing date-like columns
    pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|opts| opts.with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| ChronolabelError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a CSV into a validated, time-ordered series
    pub fn load<P: AsRef<Path>>(path: P, timestamp_col: &str) -> Result<BarSeries> {
        let df = Self::normalize_columns(Self::load_frame(&path)?)?;
        let series = BarSeries::new(df, timestamp_col)?;
        log::info!(
            "Loaded {} rows from {}",
            series.len(),
            path.as_ref().display()
        );
        Ok(series)
    }

    pub fn write<P: AsRef<Path>>(path: P, series: &BarSeries) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(&path)?;
        let mut frame = series.frame().clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)?;

        log::info!("Wrote {} rows to {}", frame.height(), path.as_ref().display());
        Ok(())
    }

    /// Rename OHLC alias columns (`Open`, `HIGH`, ...) to lowercase standard
    /// names. Frames without OHLC columns are returned unchanged.
    pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
        for required in RequiredColumn::all() {
            let standard_name = required.as_str();
            if let Some(actual_name) = DataValidator::find_column(&df, &required) {
                if actual_name != standard_name {
                    df.rename(actual_name, standard_name.into()).map_err(|e| {
                        ChronolabelError::DataLoading(format!("Failed to rename column: {}", e))
                    })?;
                }
            }
        }

        Ok(df)
    }
}
