pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod ml;
pub mod pipeline;
pub mod splitters;
pub mod validation;

pub use error::{ChronolabelError, Result};
