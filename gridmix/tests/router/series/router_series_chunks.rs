use std::time::Duration;

use crate::helpers::{days, dt, harness, harness_with, hours, memory_harness_with};
use gridmix::{GridmixError, SeriesKey};
use gridmix_mock::MockBehavior;

#[tokio::test]
async fn long_window_is_split_into_ordered_chunks() {
    let h = harness_with(|b| b.chunk_days(2));
    let key = SeriesKey::FLOW_ES_TO_PT;
    let start = dt(2024, 5, 1, 0);

    let table = h.gm.fetch_series(key, days(start, 5)).await.unwrap();

    assert_eq!(
        h.fetched(key).await,
        vec![days(start, 2), days(dt(2024, 5, 3, 0), 2), days(dt(2024, 5, 5, 0), 1)]
    );
    assert_eq!(table.len(), 5 * 24);
    assert!(table.index.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn default_chunks_span_at_most_a_year() {
    let h = harness();
    let key = SeriesKey::FLOW_PT_TO_ES;
    let start = dt(2022, 1, 1, 0);

    h.gm.fetch_series(key, days(start, 400)).await.unwrap();

    let calls = h.fetched(key).await;
    assert_eq!(calls, vec![days(start, 365), days(dt(2023, 1, 1, 0), 35)]);
}

#[tokio::test]
async fn failed_chunk_fails_the_request_and_writes_nothing() {
    let h = harness_with(|b| b.chunk_days(1));
    let key = SeriesKey::GENERATION_PT;
    let boom = GridmixError::connector("scripted", "503 Service Unavailable");
    h.ctl
        .fail_chunk_containing(key, dt(2024, 6, 3, 5), boom.clone())
        .await;

    let err = h
        .gm
        .fetch_series(key, days(dt(2024, 6, 1, 0), 4))
        .await
        .unwrap_err();

    assert_eq!(err, boom);
    assert_eq!(h.gm.cached_coverage(key).await.unwrap(), None);
}

#[tokio::test]
async fn failed_extension_keeps_previous_entry() {
    let h = harness();
    let key = SeriesKey::GENERATION_ES;
    h.gm.fetch_series(key, hours(0, 4)).await.unwrap();
    h.ctl
        .set_behavior(key, MockBehavior::Fail(GridmixError::connector("scripted", "down")))
        .await;

    assert!(h.gm.fetch_series(key, hours(0, 8)).await.is_err());
    assert_eq!(h.gm.cached_coverage(key).await.unwrap(), Some(hours(0, 4)));

    h.ctl.clear_all_behaviors().await;
    let table = h.gm.fetch_series(key, hours(0, 8)).await.unwrap();
    assert_eq!(table.len(), 8);
}

#[tokio::test]
async fn hanging_chunk_times_out() {
    let (gm, ctl) = memory_harness_with(|b| b.provider_timeout(Duration::from_millis(50)));
    let key = SeriesKey::FLOW_FR_TO_ES;
    ctl.set_behavior(key, MockBehavior::Hang).await;

    let err = gm.fetch_series(key, hours(0, 2)).await.unwrap_err();

    assert_eq!(err, GridmixError::provider_timeout("scripted", "fetch_chunk"));
    assert_eq!(gm.cached_coverage(key).await.unwrap(), None);
}

#[tokio::test]
async fn coarser_than_hourly_data_is_rejected() {
    let h = harness();
    let key = SeriesKey::FLOW_ES_TO_FR;
    let daily = vec![gridmix::Point::new(
        dt(2024, 6, 9, 0),
        chrono::TimeDelta::days(1),
        300.0,
        None,
    )];
    h.ctl.set_behavior(key, MockBehavior::Return(daily)).await;

    let err = h
        .gm
        .fetch_series(key, days(dt(2024, 6, 9, 0), 1))
        .await
        .unwrap_err();

    assert!(matches!(err, GridmixError::Resolution { .. }), "got {err:?}");
    assert_eq!(h.gm.cached_coverage(key).await.unwrap(), None);
}
