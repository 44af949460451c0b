use std::time::Duration;

use crate::helpers::{dt, flow, harness, hours, memory_harness_with};
use gridmix::{GridmixError, SeriesKey, TimeWindow};
use gridmix_mock::MockBehavior;

#[tokio::test]
async fn two_country_bundle_fetches_four_series() {
    let h = harness();

    let bundle = h.gm.fetch_bundle(hours(0, 6), false).await.unwrap();

    assert_eq!(bundle.len(), 6);
    assert!(!bundle.has_france());
    let mut keys: Vec<SeriesKey> = h.ctl.calls().await.into_iter().map(|(k, _)| k).collect();
    keys.sort();
    let mut expected = vec![
        SeriesKey::GENERATION_PT,
        SeriesKey::GENERATION_ES,
        SeriesKey::FLOW_PT_TO_ES,
        SeriesKey::FLOW_ES_TO_PT,
    ];
    expected.sort();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn three_country_bundle_is_aligned_on_one_index() {
    let h = harness();

    let bundle = h.gm.fetch_bundle(hours(0, 4), true).await.unwrap();

    assert!(bundle.has_france());
    assert_eq!(bundle.index.len(), 4);
    assert_eq!(bundle.generation_es.index, bundle.index);
    assert_eq!(bundle.flow_fr_to_es.as_ref().map(Vec::len), Some(4));
    assert_eq!(h.ctl.calls().await.len(), 7);
}

#[tokio::test]
async fn misaligned_series_is_an_index_mismatch() {
    let h = harness();
    h.ctl
        .set_behavior(
            SeriesKey::FLOW_ES_TO_PT,
            MockBehavior::Return(flow(dt(2024, 6, 10, 0), &[10.0, 20.0])),
        )
        .await;

    let err = h.gm.fetch_bundle(hours(0, 3), false).await.unwrap_err();

    assert_eq!(
        err,
        GridmixError::IndexMismatch {
            series: "flow_es_to_pt".into(),
            reference: "generation_pt".into(),
        }
    );
}

#[tokio::test]
async fn one_failing_series_fails_the_bundle() {
    let h = harness();
    let boom = GridmixError::connector("scripted", "refused");
    h.ctl
        .set_behavior(SeriesKey::FLOW_ES_TO_FR, MockBehavior::Fail(boom.clone()))
        .await;

    let err = h.gm.fetch_bundle(hours(0, 3), true).await.unwrap_err();

    assert_eq!(err, boom);
}

#[tokio::test]
async fn out_of_bounds_windows_are_rejected_before_any_fetch() {
    let h = harness();
    let before_records =
        TimeWindow::new(dt(2014, 12, 31, 23), dt(2015, 1, 1, 2)).unwrap();
    let past_current_hour = hours(10, 13);
    let too_short = TimeWindow::new(
        dt(2024, 6, 10, 3),
        dt(2024, 6, 10, 3) + chrono::TimeDelta::minutes(30),
    )
    .unwrap();
    let unaligned = TimeWindow::new(
        dt(2024, 6, 10, 3) + chrono::TimeDelta::minutes(15),
        dt(2024, 6, 10, 5),
    )
    .unwrap();

    for (window, needle) in [
        (before_records, "records start"),
        (past_current_hour, "latest available hour"),
        (too_short, "shorter than"),
        (unaligned, "whole hours"),
    ] {
        let err = h.gm.fetch_bundle(window, false).await.unwrap_err();
        assert!(err.is_validation(), "{window}: {err:?}");
        assert!(err.to_string().contains(needle), "{window}: {err}");
    }
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn window_ending_at_the_current_hour_is_accepted() {
    let h = harness();
    let bundle = h.gm.fetch_bundle(hours(11, 12), false).await.unwrap();
    assert_eq!(bundle.len(), 1);
}

#[tokio::test]
async fn request_deadline_bounds_the_bundle() {
    let (gm, ctl) = memory_harness_with(|b| b.request_timeout(Duration::from_millis(50)));
    ctl.set_behavior(SeriesKey::GENERATION_ES, MockBehavior::Hang).await;

    let err = gm.fetch_bundle(hours(0, 2), false).await.unwrap_err();

    assert_eq!(err, GridmixError::request_timeout("fetch_bundle"));
}
