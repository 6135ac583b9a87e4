use super::traits::ConfigSection;
use crate::error::{ChronolabelError, Result};
use crate::splitters::WindowType;
use serde::{Deserialize, Serialize};

/// Single purged/embargoed train/test split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_size: f64,      // e.g., 0.2 = last 20% is test
    pub purge_bars: usize,   // dropped from the end of train
    pub embargo_bars: usize, // dropped from the start of test
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            purge_bars: 0,
            embargo_bars: 0,
        }
    }
}

impl ConfigSection for SplitConfig {
    fn section_name() -> &'static str {
        "split"
    }

    fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ChronolabelError::Configuration(format!(
                "test_size must be between 0 and 1, got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

/// Calendar-based walk-forward windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkForwardConfig {
    pub train_months: u32,
    pub test_weeks: u32,
    pub step_weeks: u32,
    pub window: WindowType,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            train_months: 3,
            test_weeks: 2,
            step_weeks: 2,
            window: WindowType::Rolling,
        }
    }
}

impl ConfigSection for WalkForwardConfig {
    fn section_name() -> &'static str {
        "walk_forward"
    }

    fn validate(&self) -> Result<()> {
        if self.train_months == 0 {
            return Err(ChronolabelError::Configuration(
                "train_months must be at least 1".to_string(),
            ));
        }
        if self.test_weeks == 0 {
            return Err(ChronolabelError::Configuration(
                "test_weeks must be at least 1".to_string(),
            ));
        }
        if self.step_weeks == 0 {
            return Err(ChronolabelError::Configuration(
                "step_weeks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
