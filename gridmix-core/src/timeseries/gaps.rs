use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};

use crate::timeseries::normalize::floor_to_hour;
use crate::{GapPeriod, GapReport, TimeWindow};

/// Report the hourly slots of `window` that have no entry in `index`.
///
/// Expected slots are the hours `h` with `window.start <= h < window.end`,
/// starting from the first whole hour. Missing slots are grouped into
/// contiguous runs. Coverage of an empty window is reported as 100%.
#[must_use]
pub fn detect_gaps(index: &[DateTime<Utc>], window: TimeWindow) -> GapReport {
    let present: HashSet<DateTime<Utc>> = index.iter().copied().collect();
    let step = TimeDelta::hours(1);

    let mut slot = floor_to_hour(window.start);
    if slot < window.start {
        slot += step;
    }

    let mut expected = 0usize;
    let mut gaps: Vec<GapPeriod> = Vec::new();
    while slot < window.end {
        expected += 1;
        if !present.contains(&slot) {
            match gaps.last_mut() {
                Some(g) if g.end + step == slot => {
                    g.end = slot;
                    g.hours += 1;
                }
                _ => gaps.push(GapPeriod {
                    start: slot,
                    end: slot,
                    hours: 1,
                }),
            }
        }
        slot += step;
    }

    let missing: usize = gaps.iter().map(|g| g.hours).sum();
    let coverage_percent = if expected == 0 {
        100.0
    } else {
        (expected - missing) as f64 / expected as f64 * 100.0
    };

    GapReport {
        key: None,
        window,
        expected,
        missing,
        coverage_percent,
        gaps,
    }
}
