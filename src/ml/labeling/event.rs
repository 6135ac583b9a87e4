use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the integer column added to labeled output
pub const LABEL_COLUMN: &str = "label";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Long = 1,         // take profit touched first
    ShortOrNone = 0,  // stop loss touched first, or both on the same bar
    Neutral = -1,     // time barrier; never emitted in labeled output
}

impl Outcome {
    pub fn as_label(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierType {
    Upper,    // Take profit
    Lower,    // Stop loss
    Vertical, // Time limit
}

/// Outcome of one hypothetical entry, decided only from bars
/// `entry_index + 1 ..= entry_index + horizon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub entry_index: usize,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub tp_price: f64,
    pub sl_price: f64,
    pub horizon: usize,
    pub outcome: Outcome,
    pub hit_barrier: BarrierType,
    /// First-touch bar deciding the outcome; `None` on a time-barrier exit
    pub exit_index: Option<usize>,
}

impl Event {
    pub fn bars_held(&self) -> usize {
        self.exit_index
            .map_or(self.horizon, |exit| exit - self.entry_index)
    }
}
