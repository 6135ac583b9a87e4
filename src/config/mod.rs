pub mod traits;
pub mod data;
pub mod labeling;
pub mod splitting;
pub mod balance;
pub mod manager;

pub use manager::{AppConfig, ConfigManager, ENV_PREFIX};
pub use traits::ConfigSection;
pub use data::DataConfig;
pub use labeling::LabelingConfig;
pub use splitting::{SplitConfig, WalkForwardConfig};
pub use balance::{BalanceConfig, BalanceMethod};
