pub mod base;
pub mod purged;
pub mod types;
pub mod wfo;

pub use base::DataSplitter;
pub use purged::PurgedSplitter;
pub use types::{DataSplit, FoldWindow, WindowType};
pub use wfo::WalkForwardSplitter;
