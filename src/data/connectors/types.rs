use serde::{Deserialize, Serialize};

/// Required OHLC columns for bar data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Open,
    High,
    Low,
    Close,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
        }
    }

    pub fn all() -> [Self; 4] {
        [Self::Open, Self::High, Self::Low, Self::Close]
    }

    pub fn names() -> [&'static str; 4] {
        Self::all().map(|col| col.as_str())
    }

    /// Common alternative column names
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Open => &["open", "Open", "OPEN", "o"],
            Self::High => &["high", "High", "HIGH", "h"],
            Self::Low => &["low", "Low", "LOW", "l"],
            Self::Close => &["close", "Close", "CLOSE", "c"],
        }
    }
}

/// A single advisory finding from the data-quality checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataIssue {
    MissingValues { column: String, count: usize },
    DuplicateTimestamps { count: usize },
    NonMonotonicTime,
    Outliers { column: String, count: usize, threshold: f64 },
    OhlcLogic { rule: String, count: usize },
    InsufficientRows { rows: usize, minimum: usize },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub rows: usize,
    pub issues: Vec<DataIssue>,
}

impl DataQualityReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}
