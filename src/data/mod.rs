pub mod connectors;
pub mod series;

pub use connectors::{CsvConnector, DataIssue, DataQualityReport, DataValidator, RequiredColumn};
pub use series::{timestamp_series, BarSeries, DEFAULT_TIMESTAMP_COLUMN};
