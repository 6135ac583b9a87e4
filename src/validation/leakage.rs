use crate::data::BarSeries;
use crate::error::{ChronolabelError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// What a passing check looked at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeakageReport {
    pub check: String,
    pub checked_columns: Vec<String>,
    /// Derived columns with no valid value at all
    pub all_missing: Vec<String>,
}

/// A leakage check over a source table and a table derived from it.
///
/// Implementations return `Err(ChronolabelError::Leakage { .. })` on the first
/// offending column and a report otherwise.
pub trait LeakageCheck: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, source: &BarSeries, derived: &BarSeries) -> Result<LeakageReport>;
}

/// Flags any derived column whose first valid value is timestamped before
/// the source's first bar.
///
/// This is a necessary, not sufficient, test: it cannot see a feature at bar
/// `t` that reads bar `t + 1`, nor any look-ahead that stays inside the
/// source's time range.
pub struct FirstTimestampCheck;

impl LeakageCheck for FirstTimestampCheck {
    fn name(&self) -> &str {
        "first-valid-timestamp"
    }

    fn check(&self, source: &BarSeries, derived: &BarSeries) -> Result<LeakageReport> {
        let mut report = LeakageReport {
            check: self.name().to_string(),
            ..LeakageReport::default()
        };

        let Some(source_start) = source.first_timestamp() else {
            log::warn!("Source table is empty; no reference start to check against");
            return Ok(report);
        };

        for column in derived.frame().get_columns() {
            let name = column.name().as_str();
            if name == derived.timestamp_col() || source.has_column(name) {
                continue;
            }

            report.checked_columns.push(name.to_string());
            match first_valid_row(column)? {
                None => {
                    log::warn!("Feature {} has all missing values", name);
                    report.all_missing.push(name.to_string());
                }
                Some(row) => {
                    let timestamp = derived.timestamps()[row];
                    if timestamp < source_start {
                        return Err(ChronolabelError::Leakage {
                            column: name.to_string(),
                            timestamp,
                            source_start,
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}

/// First row holding a non-null value; NaN counts as missing for floats.
fn first_valid_row(column: &Column) -> Result<Option<usize>> {
    if column.dtype().is_float() {
        let cast = column.cast(&DataType::Float64)?;
        return Ok(cast
            .f64()?
            .into_iter()
            .position(|value| value.is_some_and(|v| !v.is_nan())));
    }

    let valid = column.as_materialized_series().is_not_null();
    let first = valid.into_iter().position(|flag| flag == Some(true));
    Ok(first)
}

/// Runs every registered check, stopping at the first leak.
pub struct LeakageGuard {
    checks: Vec<Box<dyn LeakageCheck>>,
}

impl Default for LeakageGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl LeakageGuard {
    pub fn new() -> Self {
        Self {
            checks: vec![Box::new(FirstTimestampCheck)],
        }
    }

    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn with_check(mut self, check: Box<dyn LeakageCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn validate(&self, source: &BarSeries, derived: &BarSeries) -> Result<Vec<LeakageReport>> {
        let mut reports = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            log::debug!("Running leakage check: {}", check.name());
            match check.check(source, derived) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    log::error!("{}", err);
                    return Err(err);
                }
            }
        }

        log::info!("No data leakage detected in {} checks", reports.len());
        Ok(reports)
    }
}

/// Convenience wrapper around the default guard.
pub fn validate_no_leakage(derived: &BarSeries, source: &BarSeries) -> Result<()> {
    LeakageGuard::new().validate(source, derived).map(|_| ())
}
