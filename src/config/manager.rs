use super::{
    balance::BalanceConfig,
    data::DataConfig,
    labeling::LabelingConfig,
    splitting::{SplitConfig, WalkForwardConfig},
    traits::ConfigSection,
};
use crate::error::{ChronolabelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `CHRONOLABEL__LABELING__TIME_BARS=24`.
pub const ENV_PREFIX: &str = "CHRONOLABEL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub labeling: LabelingConfig,
    pub split: SplitConfig,
    pub walk_forward: WalkForwardConfig,
    pub balance: BalanceConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        validate_section(&self.data)?;
        validate_section(&self.labeling)?;
        validate_section(&self.split)?;
        validate_section(&self.walk_forward)?;
        validate_section(&self.balance)?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| {
                ChronolabelError::Configuration(format!("Failed to parse config: {}", e))
            })?;
        config.validate()?;
        Ok(config)
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<()> {
    section.validate().map_err(|e| match e {
        ChronolabelError::Configuration(msg) => {
            ChronolabelError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    })
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file, layered with `CHRONOLABEL__*` environment overrides,
    /// and validate every section before replacing the current config.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = Self::layered(Some(path.as_ref()))?;
        log::info!("Loaded configuration from {}", path.as_ref().display());

        *self.write_guard()? = config;
        Ok(())
    }

    /// Defaults layered with `CHRONOLABEL__*` environment overrides.
    pub fn load_from_env(&self) -> Result<()> {
        let config = Self::layered(None)?;
        log::debug!("Loaded configuration from defaults and environment");

        *self.write_guard()? = config;
        Ok(())
    }

    fn layered(path: Option<&Path>) -> Result<AppConfig> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| ChronolabelError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| {
                ChronolabelError::Configuration(format!("Failed to write config: {}", e))
            })?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply `f` to a copy and keep it only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.write_guard()? = candidate;
        Ok(())
    }

    fn write_guard(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>> {
        self.config
            .write()
            .map_err(|_| ChronolabelError::Configuration("config lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitters::WindowType;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [labeling]
            time_bars = 24

            [walk_forward]
            window = "anchored"
            "#,
        )
        .unwrap();

        assert_eq!(config.labeling.time_bars, 24);
        assert_eq!(config.labeling.atr_col, "atr_14");
        assert_eq!(config.walk_forward.window, WindowType::Anchored);
        assert_eq!(config.split, SplitConfig::default());
    }

    #[test]
    fn test_invalid_section_is_named() {
        let err = AppConfig::from_toml_str("[split]\ntest_size = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("[split]"));
    }

    #[test]
    fn test_unknown_balance_method_rejected() {
        assert!(AppConfig::from_toml_str("[balance]\nmethod = \"oversample\"\n").is_err());
    }

    #[test]
    fn test_update_keeps_previous_on_failure() {
        let manager = ConfigManager::new();
        let result = manager.update(|config| config.walk_forward.train_months = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().walk_forward.train_months, 3);

        manager.update(|config| config.split.purge_bars = 5).unwrap();
        assert_eq!(manager.get().split.purge_bars, 5);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chronolabel.toml");

        let manager = ConfigManager::new();
        manager
            .update(|config| {
                config.labeling.tp_multiplier = 3.0;
                config.balance.seed = 7;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().labeling.tp_multiplier, 3.0);
        assert_eq!(reloaded.get().balance.seed, 7);
    }
}
