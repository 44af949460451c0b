use crate::helpers::{dt, flow, harness, harness_with, hours};
use gridmix::{SeriesKey, TimeWindow};
use gridmix_mock::MockBehavior;

#[tokio::test]
async fn reset_cache_forces_a_refetch() {
    let h = harness();
    let key = SeriesKey::GENERATION_PT;
    h.gm.fetch_series(key, hours(0, 3)).await.unwrap();

    h.gm.reset_cache().await.unwrap();
    assert_eq!(h.gm.cached_coverage(key).await.unwrap(), None);

    h.gm.fetch_series(key, hours(0, 3)).await.unwrap();
    assert_eq!(h.fetched(key).await, vec![hours(0, 3), hours(0, 3)]);
}

#[tokio::test]
async fn reset_series_only_drops_one_entry() {
    let h = harness();
    h.gm.fetch_bundle(hours(0, 2), false).await.unwrap();

    h.gm.reset_series(SeriesKey::FLOW_PT_TO_ES).await.unwrap();

    assert_eq!(h.gm.cached_coverage(SeriesKey::FLOW_PT_TO_ES).await.unwrap(), None);
    assert_eq!(
        h.gm.cached_coverage(SeriesKey::GENERATION_PT).await.unwrap(),
        Some(hours(0, 2))
    );
}

#[tokio::test]
async fn initialize_cache_fills_every_series_up_to_the_current_hour() {
    let h = harness_with(|b| b.records_start(dt(2024, 6, 9, 0)));

    h.gm.initialize_cache().await.unwrap();

    let full = TimeWindow::new(dt(2024, 6, 9, 0), dt(2024, 6, 10, 12)).unwrap();
    for key in SeriesKey::BUNDLE {
        assert_eq!(h.gm.cached_coverage(key).await.unwrap(), Some(full), "{key}");
    }

    h.ctl.clear_calls().await;
    h.gm.initialize_cache().await.unwrap();
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn gap_report_groups_missing_hours() {
    let h = harness();
    let key = SeriesKey::FLOW_ES_TO_PT;
    let mut points = flow(dt(2024, 6, 10, 0), &[1.0, 2.0]);
    points.extend(flow(dt(2024, 6, 10, 5), &[3.0]));
    h.ctl.set_behavior(key, MockBehavior::Return(points)).await;
    h.gm.fetch_series(key, hours(0, 6)).await.unwrap();

    let report = h.gm.gap_report(key, hours(0, 6)).await.unwrap();

    assert_eq!(report.key, Some(key));
    assert_eq!(report.expected, 6);
    assert_eq!(report.missing, 3);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].start, dt(2024, 6, 10, 2));
    assert_eq!(report.gaps[0].end, dt(2024, 6, 10, 4));
    assert!((report.coverage_percent - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn gap_report_of_uncached_series_is_all_missing_and_fetches_nothing() {
    let h = harness();

    let report = h.gm.gap_report(SeriesKey::GENERATION_FR, hours(0, 4)).await.unwrap();

    assert_eq!(report.missing, 4);
    assert!(!report.is_complete());
    assert!(h.ctl.calls().await.is_empty());
}
