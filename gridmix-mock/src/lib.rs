use async_trait::async_trait;
use chrono::TimeDelta;
use gridmix_core::{Area, GridmixError, Point, SeriesKey, SeriesSource, TimeWindow};

pub mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};

/// Mock source for CI-safe tests and demos. Provides deterministic synthetic
/// data for any window.
///
/// Spanish generation is published at 15-minute resolution and everything
/// else hourly, so callers exercise resampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

impl MockSource {
    /// Create the mock source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Native resolution of `key` in this mock.
    #[must_use]
    pub const fn resolution(key: SeriesKey) -> TimeDelta {
        match key {
            SeriesKey::Generation(Area::Spain) => TimeDelta::minutes(15),
            _ => TimeDelta::hours(1),
        }
    }
}

/// Deterministic points of `key` whose start lies in `window`.
///
/// Slots are aligned to `window.start` at the mock resolution of `key`.
#[must_use]
pub fn synthetic_points(key: SeriesKey, window: TimeWindow) -> Vec<Point> {
    let step = MockSource::resolution(key);
    let mut out = Vec::new();
    let mut ts = window.start;
    while ts < window.end {
        match key {
            SeriesKey::Generation(area) => {
                for (code, base) in fixtures::generation::profile(area) {
                    out.push(Point::new(
                        ts,
                        step,
                        fixtures::generation::value(code, *base, ts),
                        Some((*code).to_string()),
                    ));
                }
            }
            SeriesKey::Flow { from, to } => {
                out.push(Point::new(ts, step, fixtures::flows::value(from, to, ts), None));
            }
        }
        ts += step;
    }
    out
}

#[async_trait]
impl SeriesSource for MockSource {
    fn name(&self) -> &'static str {
        "gridmix-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    async fn fetch_chunk(
        &self,
        key: SeriesKey,
        window: TimeWindow,
    ) -> Result<Vec<Point>, GridmixError> {
        Ok(synthetic_points(key, window))
    }
}
