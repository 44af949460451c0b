use chrono::{DateTime, TimeDelta, Utc};
use gridmix::{AttributionStrategy, Granularity, GridmixError, SeriesKey, TimePattern, TimeWindow};
use gridmix_mock::{MockBehavior, MockSource, synthetic_points};

use crate::helpers::{days, dt, harness, harness_with, hours};

fn hourly_sum(key: SeriesKey, ts: DateTime<Utc>) -> f64 {
    let w = TimeWindow::new(ts, ts + TimeDelta::hours(1)).unwrap();
    synthetic_points(key, w).iter().map(|p| p.value).sum()
}

/// Hourly mean of `key` at `ts`, averaging sub-hourly slots.
fn hourly_mean(key: SeriesKey, ts: DateTime<Utc>) -> f64 {
    let slots = TimeDelta::hours(1).num_minutes() / MockSource::resolution(key).num_minutes();
    hourly_sum(key, ts) / slots as f64
}

/// Power available in Portugal at `ts`: own generation minus exports plus imports.
fn expected_total(ts: DateTime<Utc>) -> f64 {
    hourly_sum(SeriesKey::GENERATION_PT, ts) - hourly_sum(SeriesKey::FLOW_PT_TO_ES, ts)
        + hourly_sum(SeriesKey::FLOW_ES_TO_PT, ts)
}

#[tokio::test]
async fn spain_mix_conserves_its_exchange_with_france() {
    let h = harness();
    let report = h.gm.compute_mix(hours(0, 6), true).await.unwrap();

    assert_eq!(report.spain_power.len(), 6);
    for (ts, row) in report.spain_power.index.iter().zip(&report.spain_power.rows) {
        let got: f64 = row.iter().sum();
        let want = hourly_mean(SeriesKey::GENERATION_ES, *ts)
            - hourly_mean(SeriesKey::FLOW_ES_TO_FR, *ts)
            + hourly_mean(SeriesKey::FLOW_FR_TO_ES, *ts);
        assert!((got - want).abs() < 1e-6 * want.abs().max(1.0), "{ts}: {got} != {want}");
    }
    for row in &report.spain_percentages.rows {
        let total: f64 = row.iter().sum();
        assert!((total - 100.0).abs() < 1e-9, "{total}");
    }
}

#[tokio::test]
async fn spain_mix_without_france_is_its_own_generation() {
    let h = harness();
    let report = h.gm.compute_mix(hours(0, 3), false).await.unwrap();

    assert_eq!(report.spain_power.len(), 3);
    for (ts, row) in report.spain_power.index.iter().zip(&report.spain_power.rows) {
        let got: f64 = row.iter().sum();
        let want = hourly_mean(SeriesKey::GENERATION_ES, *ts);
        assert!((got - want).abs() < 1e-6 * want.abs().max(1.0), "{ts}: {got} != {want}");
    }
}

#[tokio::test]
async fn every_strategy_conserves_portuguese_energy() {
    for (strategy, include_france) in [
        (AttributionStrategy::TwoCountry, false),
        (AttributionStrategy::Chain, true),
        (AttributionStrategy::Discriminated, true),
    ] {
        let h = harness();
        let report = h
            .gm
            .compute_mix_with(hours(0, 12), include_france, strategy)
            .await
            .unwrap();

        assert_eq!(report.strategy, strategy);
        assert_eq!(report.power.len(), 12);
        for (ts, row) in report.power.index.iter().zip(&report.power.rows) {
            let got: f64 = row.iter().sum();
            let want = expected_total(*ts);
            assert!(
                (got - want).abs() < 1e-6 * want.abs().max(1.0),
                "{strategy:?} at {ts}: {got} != {want}"
            );
        }
        for row in &report.percentages.rows {
            let total: f64 = row.iter().sum();
            assert!((total - 100.0).abs() < 1e-9, "{strategy:?}: {total}");
        }
        assert!(report.warnings.is_empty());
    }
}

#[tokio::test]
async fn default_strategy_depends_on_france() {
    let h = harness();
    let without = h.gm.compute_mix(hours(0, 2), false).await.unwrap();
    let with = h.gm.compute_mix(hours(0, 2), true).await.unwrap();

    assert_eq!(without.strategy, AttributionStrategy::TwoCountry);
    assert_eq!(with.strategy, AttributionStrategy::Chain);
}

#[tokio::test]
async fn three_country_strategy_without_france_is_rejected() {
    let h = harness();
    let err = h
        .gm
        .compute_mix_with(hours(0, 2), false, AttributionStrategy::Discriminated)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn discriminated_report_breaks_down_by_origin() {
    let h = harness_with(|b| b.strategy(AttributionStrategy::Discriminated));

    let report = h.gm.compute_mix(hours(8, 12), true).await.unwrap();

    assert!(!report.breakdown.is_empty());
    let origins: std::collections::BTreeSet<_> =
        report.breakdown.iter().map(|r| r.origin.slug()).collect();
    assert_eq!(origins.len(), 3);
    let global: f64 = report.breakdown.iter().map(|r| r.global_percent).sum();
    assert!((global - 100.0).abs() < 1e-9);
    for row in &report.breakdown {
        assert!((row.energy_mwh - row.power_mw * 4.0).abs() < 1e-9);
        assert!(row.energy.ends_with("Wh"));
    }
}

#[tokio::test]
async fn chain_report_has_no_breakdown_but_a_summary() {
    let h = harness();
    let report = h.gm.compute_mix(hours(0, 6), true).await.unwrap();

    assert!(report.breakdown.is_empty());
    assert!(!report.summary.is_empty());
    assert!(report.summary.windows(2).all(|w| w[0].mean_mw >= w[1].mean_mw));
    let pct: f64 = report.summary.iter().map(|s| s.percent).sum();
    assert!((pct - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn pattern_keeps_only_selected_hours() {
    let h = harness();
    let pattern = TimePattern::new("2024", "6", "9-10", "2-4");

    let report = h.gm.compute_mix(pattern, false).await.unwrap();

    assert_eq!(
        report.window,
        TimeWindow::new(dt(2024, 6, 9, 2), dt(2024, 6, 10, 4)).unwrap()
    );
    let hours_seen: Vec<u32> = report
        .power
        .index
        .iter()
        .map(|ts| chrono::Timelike::hour(ts))
        .collect();
    assert_eq!(hours_seen, vec![2, 3, 2, 3]);
}

#[tokio::test]
async fn malformed_pattern_is_rejected_before_io() {
    let h = harness();
    let err = h
        .gm
        .compute_mix(TimePattern::new("2024", "13", "", ""), false)
        .await
        .unwrap_err();
    assert!(matches!(err, GridmixError::InvalidArg(_)));
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn no_data_yields_an_empty_report() {
    let h = harness();
    for key in [
        SeriesKey::GENERATION_PT,
        SeriesKey::GENERATION_ES,
        SeriesKey::FLOW_PT_TO_ES,
        SeriesKey::FLOW_ES_TO_PT,
    ] {
        h.ctl.set_behavior(key, MockBehavior::Return(Vec::new())).await;
    }

    let report = h.gm.compute_mix(hours(0, 3), false).await.unwrap();

    assert!(report.power.is_empty());
    assert!(report.percentages.is_empty());
    assert!(report.summary.is_empty());
    assert_eq!(report.warnings.len(), 1);
}

#[tokio::test]
async fn daily_granularity_averages_calendar_days() {
    let h = harness_with(|b| b.granularity(Granularity::Daily));

    let report = h
        .gm
        .compute_mix(days(dt(2024, 6, 7, 0), 3), false)
        .await
        .unwrap();

    assert_eq!(report.granularity, Granularity::Daily);
    assert_eq!(
        report.power.index,
        vec![dt(2024, 6, 7, 0), dt(2024, 6, 8, 0), dt(2024, 6, 9, 0)]
    );
}

#[tokio::test]
async fn lisbon_buckets_follow_local_midnight() {
    let h = harness_with(|b| {
        b.granularity(Granularity::Daily)
            .timezone(chrono_tz::Europe::Lisbon)
    });

    let report = h
        .gm
        .compute_mix(days(dt(2024, 6, 7, 0), 2), false)
        .await
        .unwrap();

    // Lisbon is UTC+1 in June, so local midnight is 23:00 UTC the day before.
    assert_eq!(
        report.power.index,
        vec![dt(2024, 6, 6, 23), dt(2024, 6, 7, 23), dt(2024, 6, 8, 23)]
    );
}
