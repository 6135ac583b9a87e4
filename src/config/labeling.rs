use super::traits::ConfigSection;
use crate::error::{ChronolabelError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    pub tp_multiplier: f64, // take profit = close + tp_multiplier * volatility
    pub sl_multiplier: f64, // stop loss = close - sl_multiplier * volatility
    pub time_bars: usize,   // maximum holding period in bars
    pub atr_col: String,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            tp_multiplier: 2.0,
            sl_multiplier: 1.0,
            time_bars: 12,
            atr_col: "atr_14".to_string(),
        }
    }
}

impl ConfigSection for LabelingConfig {
    fn section_name() -> &'static str {
        "labeling"
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tp_multiplier", self.tp_multiplier),
            ("sl_multiplier", self.sl_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ChronolabelError::Configuration(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.time_bars == 0 {
            return Err(ChronolabelError::Configuration(
                "time_bars must be at least 1".to_string(),
            ));
        }
        if self.atr_col.trim().is_empty() {
            return Err(ChronolabelError::Configuration(
                "atr_col must name a volatility column".to_string(),
            ));
        }
        Ok(())
    }
}
