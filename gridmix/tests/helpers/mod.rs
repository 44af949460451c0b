// Shared fixtures for the orchestrator suite; not every test uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use gridmix::{Clock, Gridmix, GridmixBuilder, MemoryStore, Point, SeriesKey, TimeWindow};
use gridmix_mock::{DynamicMockController, DynamicMockSource};
use tempfile::TempDir;

/// Construct a UTC `DateTime` on a whole hour for readability in tests.
pub const fn dt(y: i32, m: u32, d: u32, hh: u32) -> DateTime<Utc> {
    let date = chrono::NaiveDate::from_ymd_opt(y, m, d).expect("invalid date");
    let naive = date.and_hms_opt(hh, 0, 0).expect("invalid time components");
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

/// Pinned wall clock: 2024-06-10 12:30 UTC, so the latest usable hour ends at 12:00.
pub fn now() -> DateTime<Utc> {
    dt(2024, 6, 10, 12) + TimeDelta::minutes(30)
}

pub fn fixed_clock() -> Clock {
    Arc::new(now)
}

/// Hours `a..b` of 2024-06-10.
pub fn hours(a: u32, b: u32) -> TimeWindow {
    TimeWindow::new(dt(2024, 6, 10, a), dt(2024, 6, 10, b)).unwrap()
}

pub fn days(from: DateTime<Utc>, n: i64) -> TimeWindow {
    TimeWindow::new(from, from + TimeDelta::days(n)).unwrap()
}

/// Hourly flow points with the given values starting at `start`.
pub fn flow(start: DateTime<Utc>, values: &[f64]) -> Vec<Point> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Point::new(
                start + TimeDelta::hours(i as i64),
                TimeDelta::hours(1),
                *v,
                None,
            )
        })
        .collect()
}

/// Orchestrator wired to a scripted source and a throwaway cache directory.
pub struct Harness {
    pub gm: Gridmix,
    pub ctl: DynamicMockController,
    pub dir: TempDir,
}

impl Harness {
    /// Windows fetched so far for `key`, sorted by start.
    pub async fn fetched(&self, key: SeriesKey) -> Vec<TimeWindow> {
        self.ctl.calls_for(key).await
    }
}

pub fn harness() -> Harness {
    harness_with(|b| b)
}

pub fn harness_with(configure: impl FnOnce(GridmixBuilder) -> GridmixBuilder) -> Harness {
    let (source, ctl) = DynamicMockSource::new_with_controller("scripted");
    let dir = tempfile::tempdir().unwrap();
    let builder = Gridmix::builder()
        .with_source(source)
        .cache_dir(dir.path())
        .clock(fixed_clock());
    let gm = configure(builder).build().unwrap();
    Harness { gm, ctl, dir }
}

/// Orchestrator over an in-memory store, for tests that race timers.
pub fn memory_harness_with(
    configure: impl FnOnce(GridmixBuilder) -> GridmixBuilder,
) -> (Gridmix, DynamicMockController) {
    let (source, ctl) = DynamicMockSource::new_with_controller("scripted");
    let builder = Gridmix::builder()
        .with_source(source)
        .with_store(Arc::new(MemoryStore::new()))
        .clock(fixed_clock());
    (configure(builder).build().unwrap(), ctl)
}
