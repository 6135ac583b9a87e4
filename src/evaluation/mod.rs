pub mod walk_forward;

pub use walk_forward::{FoldResult, WalkForwardReport, WalkForwardRunner};
