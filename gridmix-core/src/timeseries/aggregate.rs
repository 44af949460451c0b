use std::collections::BTreeMap;

use chrono::offset::LocalResult;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{Granularity, Table};

const DAY: i64 = 86_400;

// 1970-01-01 was a Thursday.
const fn week_start_day(day: i64) -> i64 {
    day - ((day + 3).rem_euclid(7))
}

fn utc_day(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let day = ts.timestamp().div_euclid(DAY);
    DateTime::from_timestamp(day * DAY, 0)
}

fn utc_week(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let day = ts.timestamp().div_euclid(DAY);
    DateTime::from_timestamp(week_start_day(day) * DAY, 0)
}

fn utc_month(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(ts.year(), ts.month(), 1)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn local_midnight_utc(ts: DateTime<Utc>, date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let naive_midnight = date.and_hms_opt(0, 0, 0)?;
    match tz.from_local_datetime(&naive_midnight) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(dt1, _) => Some(dt1.with_timezone(&Utc)),
        // Midnight skipped by a DST jump: fall back to the UTC day.
        LocalResult::None => utc_day(ts),
    }
}

fn tz_day(ts: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    local_midnight_utc(ts, ts.with_timezone(&tz).date_naive(), tz)
}

fn tz_week(ts: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let local = ts.with_timezone(&tz);
    let date = local.date_naive();
    let back = i64::from(local.weekday().num_days_from_monday());
    let monday = date
        .checked_sub_signed(chrono::Duration::days(back))
        .unwrap_or(date);
    local_midnight_utc(ts, monday, tz)
}

fn tz_month(ts: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let local = ts.with_timezone(&tz);
    let first = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)?;
    local_midnight_utc(ts, first, tz)
}

/// Start of the calendar bucket containing `ts`, as a UTC instant.
///
/// Buckets are drawn in `tz` when given, in UTC otherwise. Weeks start on
/// Monday. `Hourly` returns `ts` unchanged.
#[must_use]
pub fn bucket_start(ts: DateTime<Utc>, granularity: Granularity, tz: Option<Tz>) -> Option<DateTime<Utc>> {
    match (granularity, tz) {
        (Granularity::Daily, Some(tz)) => tz_day(ts, tz),
        (Granularity::Daily, None) => utc_day(ts),
        (Granularity::Weekly, Some(tz)) => tz_week(ts, tz),
        (Granularity::Weekly, None) => utc_week(ts),
        (Granularity::Monthly, Some(tz)) => tz_month(ts, tz),
        (Granularity::Monthly, None) => utc_month(ts),
        _ => Some(ts),
    }
}

/// Aggregate a table to `granularity` by taking the column-wise mean of the
/// rows in each bucket. Output rows are labelled with the bucket start.
#[must_use]
pub fn aggregate_mean(table: &Table, granularity: Granularity, tz: Option<Tz>) -> Table {
    if matches!(granularity, Granularity::Hourly) {
        return table.clone();
    }
    let width = table.columns.len();
    let mut buckets: BTreeMap<DateTime<Utc>, (Vec<f64>, usize)> = BTreeMap::new();
    for (ts, row) in table.index.iter().zip(&table.rows) {
        let Some(bucket) = bucket_start(*ts, granularity, tz) else {
            continue;
        };
        let (sums, n) = buckets.entry(bucket).or_insert_with(|| (vec![0.0; width], 0));
        for (s, v) in sums.iter_mut().zip(row) {
            *s += v;
        }
        *n += 1;
    }

    let mut out = Table::new(Vec::new(), table.columns.clone(), Vec::new());
    for (bucket, (sums, n)) in buckets {
        out.index.push(bucket);
        out.rows.push(sums.into_iter().map(|s| s / n as f64).collect());
    }
    out
}
