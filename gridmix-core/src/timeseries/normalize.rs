use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeDelta, Utc};

use crate::{GridmixError, Point, Table};

const HOUR: i64 = 3_600;

/// Floor a timestamp to the start of its UTC hour.
#[must_use]
pub const fn floor_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    match DateTime::from_timestamp(secs - secs.rem_euclid(HOUR), 0) {
        Some(dt) => dt,
        None => ts,
    }
}

/// Render a resolution the way ENTSO-E writes it (`PT15M`, `PT1H`, `P1D`).
#[must_use]
pub fn format_resolution(resolution: TimeDelta) -> String {
    let secs = resolution.num_seconds();
    if secs > 0 && secs % 86_400 == 0 {
        format!("P{}D", secs / 86_400)
    } else if secs > 0 && secs % HOUR == 0 {
        format!("PT{}H", secs / HOUR)
    } else if secs > 0 && secs % 60 == 0 {
        format!("PT{}M", secs / 60)
    } else {
        format!("PT{secs}S")
    }
}

/// Average points that share the same `(start_time, category)`.
///
/// The output is sorted by start time, then category. The resolution of the
/// first occurrence is kept.
#[must_use]
pub fn average_duplicates(points: Vec<Point>) -> Vec<Point> {
    let mut acc: BTreeMap<(DateTime<Utc>, Option<String>), (Point, f64, usize)> = BTreeMap::new();
    for p in points {
        let key = (p.start_time, p.category.clone());
        acc.entry(key)
            .and_modify(|(_, sum, n)| {
                *sum += p.value;
                *n += 1;
            })
            .or_insert_with(|| {
                let v = p.value;
                (p, v, 1)
            });
    }
    acc.into_values()
        .map(|(mut p, sum, n)| {
            p.value = sum / n as f64;
            p
        })
        .collect()
}

/// Resample points onto a uniform one-hour grid.
///
/// Duplicates are averaged first, then every point whose start falls in
/// `[h, h + 1h)` contributes to the mean labelled `h`. Categories are kept
/// apart. Hours with no points produce no row.
///
/// # Errors
/// Returns `GridmixError::Resolution` if any point has a resolution coarser
/// than one hour.
pub fn resample_to_hourly(points: Vec<Point>) -> Result<Vec<Point>, GridmixError> {
    let hour = TimeDelta::hours(1);
    if let Some(p) = points.iter().find(|p| p.resolution > hour) {
        return Err(GridmixError::Resolution {
            resolution: format_resolution(p.resolution),
            target: format_resolution(hour),
        });
    }

    let mut buckets: BTreeMap<(DateTime<Utc>, Option<String>), (f64, usize)> = BTreeMap::new();
    for p in average_duplicates(points) {
        let slot = buckets
            .entry((floor_to_hour(p.start_time), p.category))
            .or_insert((0.0, 0));
        slot.0 += p.value;
        slot.1 += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|((start, category), (sum, n))| Point::new(start, hour, sum / n as f64, category))
        .collect())
}

/// Pivot long-form points into one column per category.
///
/// Columns are sorted by name. Cells with no observation are `0.0`.
#[must_use]
pub fn pivot(points: &[Point]) -> Table {
    let columns: Vec<String> = points
        .iter()
        .map(|p| p.column().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index: Vec<DateTime<Utc>> = points
        .iter()
        .map(|p| p.start_time)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut rows = vec![vec![0.0; columns.len()]; index.len()];
    for p in points {
        // Both lookups succeed: index and columns were built from `points`.
        if let (Ok(i), Ok(j)) = (
            index.binary_search(&p.start_time),
            columns.binary_search_by(|c| c.as_str().cmp(p.column())),
        ) {
            rows[i][j] = p.value;
        }
    }
    Table::new(index, columns, rows)
}
