use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use gridmix_core::{GridmixError, Point, SeriesKey, SeriesSource, TimeWindow};
use gridmix_mock::{DynamicMockSource, MockBehavior, MockSource, synthetic_points};

fn ts(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, h, 0, 0).unwrap()
}

fn window(a: u32, b: u32) -> TimeWindow {
    TimeWindow::new(ts(a), ts(b)).unwrap()
}

#[tokio::test]
async fn mock_source_is_deterministic() {
    let src = MockSource::new();
    let a = src.fetch_chunk(SeriesKey::GENERATION_PT, window(0, 6)).await.unwrap();
    let b = src.fetch_chunk(SeriesKey::GENERATION_PT, window(0, 6)).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 6 * 6, "six sources over six hours");
}

#[test]
fn spanish_generation_is_quarter_hourly() {
    let points = synthetic_points(SeriesKey::GENERATION_ES, window(0, 1));
    assert!(points.iter().all(|p| p.resolution == TimeDelta::minutes(15)));
    assert_eq!(points.len(), 4 * 7);
}

#[test]
fn solar_is_dark_at_night_and_values_are_non_negative() {
    let points = synthetic_points(SeriesKey::GENERATION_FR, window(0, 24));
    assert!(points.iter().all(|p| p.value >= 0.0));
    let night_solar = points
        .iter()
        .find(|p| p.start_time == ts(2) && p.category.as_deref() == Some("B16"))
        .unwrap();
    assert_eq!(night_solar.value, 0.0);
}

#[tokio::test]
async fn dynamic_mock_records_calls_and_falls_back_to_synthetic() {
    let (src, ctl) = DynamicMockSource::new_with_controller("dyn");
    let got = src.fetch_chunk(SeriesKey::FLOW_FR_TO_ES, window(0, 3)).await.unwrap();
    assert_eq!(got, synthetic_points(SeriesKey::FLOW_FR_TO_ES, window(0, 3)));
    assert_eq!(ctl.calls().await, vec![(SeriesKey::FLOW_FR_TO_ES, window(0, 3))]);
    assert_eq!(ctl.calls_for(SeriesKey::FLOW_FR_TO_ES).await, vec![window(0, 3)]);
    assert!(ctl.calls_for(SeriesKey::FLOW_ES_TO_FR).await.is_empty());
}

#[tokio::test]
async fn dynamic_mock_return_serves_window_slice() {
    let (src, ctl) = DynamicMockSource::new_with_controller("dyn");
    let points: Vec<Point> = (0..5)
        .map(|h| Point::new(ts(h), TimeDelta::hours(1), f64::from(h), None))
        .collect();
    ctl.set_behavior(SeriesKey::FLOW_PT_TO_ES, MockBehavior::Return(points))
        .await;

    let got = src.fetch_chunk(SeriesKey::FLOW_PT_TO_ES, window(1, 3)).await.unwrap();
    let values: Vec<f64> = got.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![1.0, 2.0]);
}

#[tokio::test]
async fn dynamic_mock_fail_and_chunk_failure() {
    let (src, ctl) = DynamicMockSource::new_with_controller("dyn");
    let err = GridmixError::connector("dyn", "boom");
    ctl.set_behavior(SeriesKey::GENERATION_PT, MockBehavior::Fail(err.clone()))
        .await;
    assert_eq!(
        src.fetch_chunk(SeriesKey::GENERATION_PT, window(0, 1)).await.unwrap_err(),
        err
    );

    ctl.fail_chunk_containing(SeriesKey::GENERATION_ES, ts(5), err.clone())
        .await;
    assert!(src.fetch_chunk(SeriesKey::GENERATION_ES, window(0, 5)).await.is_ok());
    assert_eq!(
        src.fetch_chunk(SeriesKey::GENERATION_ES, window(5, 6)).await.unwrap_err(),
        err
    );
}

#[tokio::test]
async fn dynamic_mock_hang_never_completes() {
    let (src, ctl) = DynamicMockSource::new_with_controller("dyn");
    ctl.set_behavior(SeriesKey::FLOW_ES_TO_PT, MockBehavior::Hang).await;
    let res = tokio::time::timeout(
        Duration::from_millis(50),
        src.fetch_chunk(SeriesKey::FLOW_ES_TO_PT, window(0, 1)),
    )
    .await;
    assert!(res.is_err());

    ctl.clear_all_behaviors().await;
    assert!(ctl.calls().await.is_empty());
}
