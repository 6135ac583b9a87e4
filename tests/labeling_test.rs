mod common;

use chrono::Duration;
use chronolabel::config::{BalanceConfig, LabelingConfig};
use chronolabel::ml::labeling::{
    validate_labels, BarrierType, LabelBalancer, Outcome, TripleBarrierLabeler, LABEL_COLUMN,
};
use common::Bars;

fn labeler() -> TripleBarrierLabeler {
    TripleBarrierLabeler::new(LabelingConfig {
        tp_multiplier: 2.0,
        sl_multiplier: 1.0,
        time_bars: 12,
        atr_col: "atr_14".to_string(),
    })
}

#[test]
fn test_random_walk_labels_are_binary() {
    let bars = Bars::random_walk(200, Duration::minutes(5), 2.0, 11);
    let run = labeler().run(&bars.series()).unwrap();

    let labels: Vec<i32> = run
        .labeled
        .frame()
        .column(LABEL_COLUMN)
        .unwrap()
        .i32()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert!(!labels.is_empty());
    assert!(labels.iter().all(|l| *l == 0 || *l == 1));
    assert_eq!(labels.len(), run.stats.long_count + run.stats.short_count);
    assert_eq!(run.stats.evaluated_count, 188);
    assert_eq!(run.stats.skipped_count, 0);
}

#[test]
fn test_no_entries_in_final_horizon() {
    let bars = Bars::random_walk(200, Duration::minutes(5), 2.0, 11);
    let events = labeler().events(&bars.series()).unwrap();

    assert_eq!(events.len(), 188);
    assert!(events.iter().all(|e| e.entry_index < 188));
    assert!(events.windows(2).all(|w| w[0].entry_index < w[1].entry_index));
}

#[test]
fn test_exit_inside_forward_window() {
    let bars = Bars::random_walk(200, Duration::minutes(5), 2.0, 23);
    let events = labeler().events(&bars.series()).unwrap();

    for event in &events {
        let i = event.entry_index;
        match event.outcome {
            Outcome::Neutral => {
                assert_eq!(event.hit_barrier, BarrierType::Vertical);
                assert!(event.exit_index.is_none());
            }
            Outcome::Long => {
                let exit = event.exit_index.unwrap();
                assert!(exit > i && exit <= i + 12);
                assert!(bars.high[exit] >= event.tp_price);
                assert!((event.tp_price - (bars.close[i] + 4.0)).abs() < 1e-9);
            }
            Outcome::ShortOrNone => {
                let exit = event.exit_index.unwrap();
                assert!(exit > i && exit <= i + 12);
                assert!(bars.low[exit] <= event.sl_price);
                assert!((event.sl_price - (bars.close[i] - 2.0)).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_labeled_rows_keep_source_values() {
    let bars = Bars::random_walk(120, Duration::minutes(5), 2.0, 5);
    let run = labeler().run(&bars.series()).unwrap();

    let closes = run.labeled.f64_values("close").unwrap();
    let decided: Vec<usize> = run
        .events
        .iter()
        .filter(|e| e.outcome != Outcome::Neutral)
        .map(|e| e.entry_index)
        .collect();
    assert_eq!(closes.len(), decided.len());
    for (close, row) in closes.iter().zip(&decided) {
        assert_eq!(*close, Some(bars.close[*row]));
        assert!(run.labeled.timestamps().contains(&bars.timestamps[*row]));
    }
}

#[test]
fn test_report_then_balance() {
    let bars = Bars::random_walk(400, Duration::minutes(5), 1.5, 99);
    let labeled = labeler().label(&bars.series()).unwrap();

    let report = validate_labels(&labeled);
    assert_eq!(report.total_samples, labeled.len());
    assert!(report.num_classes >= 1);
    let total_share: f64 = report.distribution.values().sum();
    assert!((total_share - 1.0).abs() < 1e-9);

    let config = BalanceConfig {
        seed: 42,
        ..BalanceConfig::default()
    };
    let first = LabelBalancer::new(config.clone()).balance(&labeled).unwrap();
    let second = LabelBalancer::new(config).balance(&labeled).unwrap();
    assert!(first.frame().equals(second.frame()));

    let balanced = validate_labels(&first);
    let min_count = report.counts.values().min().copied().unwrap();
    assert!(balanced.counts.values().all(|c| *c == min_count));
}
