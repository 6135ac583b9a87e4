use super::event::{BarrierType, Event, Outcome, LABEL_COLUMN};
use crate::config::{ConfigSection, LabelingConfig};
use crate::data::{BarSeries, RequiredColumn};
use crate::error::Result;
use chrono::{DateTime, Utc};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub struct TripleBarrierLabeler {
    config: LabelingConfig,
}

/// Result of one labeling pass
#[derive(Debug, Clone)]
pub struct LabelRun {
    /// Source rows with a decided outcome, plus the `label` column
    pub labeled: BarSeries,
    /// Every evaluated entry, neutral ones included
    pub events: Vec<Event>,
    pub stats: LabelStats,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    pub evaluated_count: usize,
    pub long_count: usize,
    pub short_count: usize,
    pub neutral_count: usize,
    /// Entries skipped for an undefined or zero volatility reading
    pub skipped_count: usize,
}

struct Columns<'a> {
    timestamps: &'a [DateTime<Utc>],
    close: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    vol: Vec<Option<f64>>,
}

impl TripleBarrierLabeler {
    pub fn new(config: LabelingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    /// Label a series, dropping neutral (time-barrier) outcomes.
    pub fn label(&self, series: &BarSeries) -> Result<BarSeries> {
        Ok(self.run(series)?.labeled)
    }

    /// Evaluate every entry with enough forward data, before the neutral drop.
    pub fn events(&self, series: &BarSeries) -> Result<Vec<Event>> {
        let columns = self.columns(series)?;
        Ok(self.scan(&columns))
    }

    pub fn run(&self, series: &BarSeries) -> Result<LabelRun> {
        log::info!(
            "Applying triple barrier: TP={}x {}, SL={}x {}, Time={} bars",
            self.config.tp_multiplier,
            self.config.atr_col,
            self.config.sl_multiplier,
            self.config.atr_col,
            self.config.time_bars
        );

        let columns = self.columns(series)?;
        let events = self.scan(&columns);
        let evaluable = series.len().saturating_sub(self.config.time_bars);
        let stats = Self::analyze_distribution(&events, evaluable);
        log::info!(
            "Label distribution: long={}, short_or_none={}, neutral={}, skipped={}",
            stats.long_count,
            stats.short_count,
            stats.neutral_count,
            stats.skipped_count
        );

        let decided: Vec<&Event> = events
            .iter()
            .filter(|event| event.outcome != Outcome::Neutral)
            .collect();
        let rows: Vec<usize> = decided.iter().map(|event| event.entry_index).collect();
        let labels: Vec<i32> = decided.iter().map(|event| event.outcome.as_label()).collect();

        let labeled = series
            .take_rows(&rows)?
            .with_column(Series::new(LABEL_COLUMN.into(), labels))?;
        log::info!("After removing neutrals: {} samples", labeled.len());

        Ok(LabelRun {
            labeled,
            events,
            stats,
        })
    }

    fn columns<'a>(&self, series: &'a BarSeries) -> Result<Columns<'a>> {
        self.config.validate()?;

        let mut required: Vec<&str> = RequiredColumn::names().to_vec();
        required.push(&self.config.atr_col);
        series.require_columns(&required)?;

        Ok(Columns {
            timestamps: series.timestamps(),
            close: series.f64_values(RequiredColumn::Close.as_str())?,
            high: series.f64_values(RequiredColumn::High.as_str())?,
            low: series.f64_values(RequiredColumn::Low.as_str())?,
            vol: series.f64_values(&self.config.atr_col)?,
        })
    }

    fn scan(&self, columns: &Columns<'_>) -> Vec<Event> {
        let last_entry = columns.timestamps.len().saturating_sub(self.config.time_bars);

        (0..last_entry)
            .into_par_iter()
            .filter_map(|entry_idx| self.label_single_entry(entry_idx, columns))
            .collect()
    }

    fn label_single_entry(&self, entry_idx: usize, columns: &Columns<'_>) -> Option<Event> {
        let entry_price = columns.close[entry_idx]?;
        let vol = columns.vol[entry_idx].filter(|v| !v.is_nan() && *v != 0.0)?;

        let tp_price = entry_price + self.config.tp_multiplier * vol;
        let sl_price = entry_price - self.config.sl_multiplier * vol;

        let horizon = self.config.time_bars;
        let mut window = (entry_idx + 1)..=(entry_idx + horizon);
        let tp_hit = window
            .clone()
            .find(|&i| columns.high[i].is_some_and(|high| high >= tp_price));
        let sl_hit = window.find(|&i| columns.low[i].is_some_and(|low| low <= sl_price));

        // Same-bar touches resolve to the stop loss.
        let (outcome, hit_barrier, exit_index) = match (tp_hit, sl_hit) {
            (Some(tp), Some(sl)) if tp < sl => (Outcome::Long, BarrierType::Upper, Some(tp)),
            (Some(_), Some(sl)) => (Outcome::ShortOrNone, BarrierType::Lower, Some(sl)),
            (Some(tp), None) => (Outcome::Long, BarrierType::Upper, Some(tp)),
            (None, Some(sl)) => (Outcome::ShortOrNone, BarrierType::Lower, Some(sl)),
            (None, None) => (Outcome::Neutral, BarrierType::Vertical, None),
        };

        Some(Event {
            entry_index: entry_idx,
            entry_time: columns.timestamps[entry_idx],
            entry_price,
            tp_price,
            sl_price,
            horizon,
            outcome,
            hit_barrier,
            exit_index,
        })
    }

    /// Outcome counts over `evaluable` entry positions
    pub fn analyze_distribution(events: &[Event], evaluable: usize) -> LabelStats {
        let mut stats = LabelStats {
            evaluated_count: events.len(),
            skipped_count: evaluable.saturating_sub(events.len()),
            ..LabelStats::default()
        };

        for event in events {
            match event.outcome {
                Outcome::Long => stats.long_count += 1,
                Outcome::ShortOrNone => stats.short_count += 1,
                Outcome::Neutral => stats.neutral_count += 1,
            }
        }

        stats
    }
}
