#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use chronolabel::data::{timestamp_series, BarSeries};
use polars::prelude::{Column, DataFrame, IntoColumn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::path::Path;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn times(n: usize, step: Duration) -> Vec<DateTime<Utc>> {
    (0..n).map(|i| start() + step * i as i32).collect()
}

/// Seeded random-walk OHLC bars with a constant `atr_14` reading.
pub struct Bars {
    pub timestamps: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub atr: f64,
}

impl Bars {
    pub fn random_walk(n: usize, step: Duration, atr: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bars = Bars {
            timestamps: times(n, step),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            atr,
        };

        let mut prev: f64 = 100.0;
        for _ in 0..n {
            let close = prev + rng.gen_range(-1.5..1.5);
            let high = prev.max(close) + rng.gen_range(0.0..1.0);
            let low = prev.min(close) - rng.gen_range(0.0..1.0);
            bars.open.push(prev);
            bars.high.push(high);
            bars.low.push(low);
            bars.close.push(close);
            prev = close;
        }
        bars
    }

    pub fn frame(&self) -> DataFrame {
        DataFrame::new(vec![
            timestamp_series("timestamp", &self.timestamps)
                .unwrap()
                .into_column(),
            Column::new("open".into(), self.open.clone()),
            Column::new("high".into(), self.high.clone()),
            Column::new("low".into(), self.low.clone()),
            Column::new("close".into(), self.close.clone()),
            Column::new("atr_14".into(), vec![self.atr; self.timestamps.len()]),
        ])
        .unwrap()
    }

    pub fn series(&self) -> BarSeries {
        BarSeries::new(self.frame(), "timestamp").unwrap()
    }

    /// CSV with capitalised OHLC headers and `YYYY-MM-DD HH:MM:SS` stamps.
    pub fn write_csv(&self, path: &Path) {
        let mut out = String::from("timestamp,Open,High,Low,Close,atr_14\n");
        for i in 0..self.timestamps.len() {
            writeln!(
                out,
                "{},{},{},{},{},{}",
                self.timestamps[i].format("%Y-%m-%d %H:%M:%S"),
                self.open[i],
                self.high[i],
                self.low[i],
                self.close[i],
                self.atr
            )
            .unwrap();
        }
        std::fs::write(path, out).unwrap();
    }
}

/// A bare series: timestamps plus a `close` column.
pub fn close_only(times: &[DateTime<Utc>]) -> BarSeries {
    let close: Vec<f64> = (0..times.len()).map(|i| 100.0 + i as f64).collect();
    let df = DataFrame::new(vec![
        timestamp_series("timestamp", times).unwrap().into_column(),
        Column::new("close".into(), close),
    ])
    .unwrap();
    BarSeries::new(df, "timestamp").unwrap()
}
