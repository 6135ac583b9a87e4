use super::traits::ConfigSection;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceMethod {
    Undersample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub method: BalanceMethod,
    pub seed: u64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            method: BalanceMethod::Undersample,
            seed: 42,
        }
    }
}

impl ConfigSection for BalanceConfig {
    fn section_name() -> &'static str {
        "balance"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
