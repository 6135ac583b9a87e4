mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{DataIssue, DataQualityReport, RequiredColumn};
pub use validator::DataValidator;
