use super::traits::ConfigSection;
use crate::data::DEFAULT_TIMESTAMP_COLUMN;
use crate::error::{ChronolabelError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub timestamp_col: String,
    pub min_rows: usize,
    pub outlier_threshold: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            timestamp_col: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            min_rows: 1000,
            outlier_threshold: 5.0,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<()> {
        if self.timestamp_col.trim().is_empty() {
            return Err(ChronolabelError::Configuration(
                "Timestamp column name must not be empty".to_string(),
            ));
        }
        if !(self.outlier_threshold.is_finite() && self.outlier_threshold > 0.0) {
            return Err(ChronolabelError::Configuration(
                "Outlier threshold must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}
