use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{Point, TimeWindow};

/// Merge cached and freshly fetched points of one series.
///
/// - Points are keyed by `(start_time, category)`; when both inputs carry a
///   key, the fetched point wins.
/// - The output is sorted by start time, then category, with no duplicates.
#[must_use]
pub fn merge_prefer_fetched(cached: Vec<Point>, fetched: Vec<Point>) -> Vec<Point> {
    let mut map: BTreeMap<(DateTime<Utc>, Option<String>), Point> = BTreeMap::new();
    for p in cached.into_iter().chain(fetched) {
        map.insert((p.start_time, p.category.clone()), p);
    }
    map.into_values().collect()
}

/// Keep the points whose start lies in `window`.
#[must_use]
pub fn filter_window(points: Vec<Point>, window: TimeWindow) -> Vec<Point> {
    points
        .into_iter()
        .filter(|p| window.contains(p.start_time))
        .collect()
}

/// Distinct start times of `points`, ascending.
#[must_use]
pub fn distinct_starts(points: &[Point]) -> Vec<DateTime<Utc>> {
    let mut out: Vec<DateTime<Utc>> = points.iter().map(|p| p.start_time).collect();
    out.sort_unstable();
    out.dedup();
    out
}
