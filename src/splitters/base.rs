use super::types::DataSplit;
use crate::data::BarSeries;
use crate::error::Result;

pub trait DataSplitter: Send + Sync {
    /// Split a series into ordered (train, test) folds
    fn split(&self, series: &BarSeries) -> Result<Vec<DataSplit>>;

    fn name(&self) -> &str;
}
