//! Recurring time patterns such as "weekday mornings of summer 2023".
//!
//! A [`TimePattern`] holds four textual fields: years, months, days and hours.
//! Each field is a comma-separated list of integers or `a-b` ranges; an empty
//! field means "all". Hours must be written as ranges whose end hour is
//! exclusive, so `0-8,8-16` selects hours 0 through 15.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{GridmixError, TimeWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Years,
    Months,
    Days,
    Hours,
}

impl Field {
    const fn bounds(self) -> (u32, u32) {
        match self {
            Self::Years => (2000, 2100),
            Self::Months => (1, 12),
            Self::Days => (1, 31),
            Self::Hours => (0, 23),
        }
    }

    const fn ranges_only(self) -> bool {
        matches!(self, Self::Hours)
    }

    const fn allows_adjacent(self) -> bool {
        matches!(self, Self::Hours)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Days => "days",
            Self::Hours => "hours",
        })
    }
}

fn parse_number(text: &str, field: Field, raw: &str) -> Result<u32, GridmixError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GridmixError::invalid_arg(format!(
            "{field} pattern not valid: {raw:?}"
        )));
    }
    text.parse::<u32>()
        .map_err(|_| GridmixError::invalid_arg(format!("{field} pattern not valid: {raw:?}")))
}

/// Parse one field into validated inclusive ranges, sorted by start.
fn parse_field(raw: &str, field: Field) -> Result<Vec<(u32, u32)>, GridmixError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let (lo, hi) = field.bounds();
    let mut ranges = Vec::new();
    for part in raw.split(',') {
        let range = match part.split_once('-') {
            Some((a, b)) => {
                let start = parse_number(a, field, raw)?;
                let end = parse_number(b, field, raw)?;
                if start >= end {
                    return Err(GridmixError::invalid_arg(format!(
                        "invalid {field} interval {part}: left bound must be less than the right"
                    )));
                }
                (start, end)
            }
            None if field.ranges_only() => {
                return Err(GridmixError::invalid_arg(format!(
                    "{field} must be given as intervals (e.g. 9-17), got {part:?}"
                )));
            }
            None => {
                let v = parse_number(part, field, raw)?;
                (v, v)
            }
        };
        if range.0 < lo || range.1 > hi {
            return Err(GridmixError::invalid_arg(format!(
                "invalid {field} value in {part}: must be between {lo} and {hi}"
            )));
        }
        ranges.push(range);
    }

    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let clash = if field.allows_adjacent() {
            prev.1 > next.0
        } else {
            prev.1 >= next.0
        };
        if clash {
            let what = if field.allows_adjacent() {
                "overlapping"
            } else {
                "overlapping or adjacent"
            };
            return Err(GridmixError::invalid_arg(format!(
                "{what} {field} ranges: {}-{} and {}-{}",
                prev.0, prev.1, next.0, next.1
            )));
        }
    }
    Ok(ranges)
}

fn expand(ranges: &[(u32, u32)], field: Field) -> Vec<u32> {
    let mut out: Vec<u32> = ranges
        .iter()
        .flat_map(|&(a, b)| if field == Field::Hours { a..b } else { a..b + 1 })
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Textual time pattern as entered by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePattern {
    /// Years, e.g. `"2020-2022,2024"`.
    pub years: String,
    /// Months, e.g. `"6-8"`.
    pub months: String,
    /// Days of month, e.g. `"1,15"`.
    pub days: String,
    /// Hour ranges, e.g. `"8-12,18-22"`.
    pub hours: String,
}

/// Expanded integer sets of a validated [`TimePattern`]. Empty means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternRules {
    /// Allowed years.
    pub years: Vec<u32>,
    /// Allowed months.
    pub months: Vec<u32>,
    /// Allowed days of month.
    pub days: Vec<u32>,
    /// Allowed hours of day; range ends are excluded.
    pub hours: Vec<u32>,
}

impl PatternRules {
    /// True when the UTC hour starting at `ts` satisfies every field.
    #[must_use]
    pub fn matches(&self, ts: DateTime<Utc>) -> bool {
        let ok = |set: &[u32], v: u32| set.is_empty() || set.binary_search(&v).is_ok();
        u32::try_from(ts.year()).is_ok_and(|y| ok(&self.years, y))
            && ok(&self.months, ts.month())
            && ok(&self.days, ts.day())
            && ok(&self.hours, ts.hour())
    }
}

fn invalid_date(year: u32, month: u32, day: u32) -> GridmixError {
    GridmixError::invalid_arg(format!(
        "invalid date components in pattern: {year:04}-{month:02}-{day:02}"
    ))
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_next = NaiveDate::from_ymd_opt(ny, nm, 1)?;
    Some(first_next.pred_opt()?.day())
}

impl TimePattern {
    /// Build a pattern from its four fields.
    pub fn new(
        years: impl Into<String>,
        months: impl Into<String>,
        days: impl Into<String>,
        hours: impl Into<String>,
    ) -> Self {
        Self {
            years: years.into(),
            months: months.into(),
            days: days.into(),
            hours: hours.into(),
        }
    }

    /// Validate and expand every field.
    ///
    /// # Errors
    /// Returns `InvalidArg` for malformed syntax, out-of-bounds values,
    /// descending ranges, single hours, or overlapping ranges.
    pub fn rules(&self) -> Result<PatternRules, GridmixError> {
        Ok(PatternRules {
            years: expand(&parse_field(&self.years, Field::Years)?, Field::Years),
            months: expand(&parse_field(&self.months, Field::Months)?, Field::Months),
            days: expand(&parse_field(&self.days, Field::Days)?, Field::Days),
            hours: expand(&parse_field(&self.hours, Field::Hours)?, Field::Hours),
        })
    }

    /// Earliest hour encoded by the pattern.
    ///
    /// Empty fields default to the records-start year, January, day 1 and 00h.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the pattern is invalid or the minimum fields do
    /// not form a calendar date.
    pub fn earliest(&self, records_start: DateTime<Utc>) -> Result<DateTime<Utc>, GridmixError> {
        let r = self.rules()?;
        let default_year = u32::try_from(records_start.year()).unwrap_or(2015);
        let year = r.years.first().copied().unwrap_or(default_year);
        let month = r.months.first().copied().unwrap_or(1);
        let day = r.days.first().copied().unwrap_or(1);
        let hour = r.hours.first().copied().unwrap_or(0);
        let date = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
            .ok_or_else(|| invalid_date(year, month, day))?;
        date.and_hms_opt(hour, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| invalid_date(year, month, day))
    }

    /// End (exclusive) of the latest hour encoded by the pattern, before clamping.
    fn latest_encoded(
        rules: &PatternRules,
        max_end: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, GridmixError> {
        let default_year = u32::try_from(max_end.year()).unwrap_or(2100);
        let year = rules.years.last().copied().unwrap_or(default_year);
        let month = rules.months.last().copied().unwrap_or(12);
        // Hour ranges are end-exclusive; no hours means the whole day.
        let end_hour = rules.hours.last().map_or(24, |h| h + 1);
        let y = i32::try_from(year).map_err(|_| invalid_date(year, month, 31))?;
        let last = last_day_of_month(y, month).ok_or_else(|| invalid_date(year, month, 31))?;
        let day = rules.days.last().copied().unwrap_or(31).min(last);
        let dt = NaiveDate::from_ymd_opt(y, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| invalid_date(year, month, day))?;
        Ok(dt.and_utc() + TimeDelta::hours(i64::from(end_hour)))
    }

    /// Latest exclusive end encoded by the pattern, clamped to
    /// `[records_start, max_end]`.
    ///
    /// Empty fields default to the `max_end` year, December, day 31 (clamped
    /// to the month's length) and the end of that day.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the pattern is invalid.
    pub fn latest(
        &self,
        records_start: DateTime<Utc>,
        max_end: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, GridmixError> {
        let encoded = Self::latest_encoded(&self.rules()?, max_end)?;
        Ok(encoded.min(max_end).max(records_start))
    }

    /// Window enclosing every hour the pattern selects, within available data.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the pattern is invalid, selects only hours
    /// before `records_start` ("records only start at ..."), or only hours at
    /// or after `max_end` ("only available until ...").
    pub fn window(
        &self,
        records_start: DateTime<Utc>,
        max_end: DateTime<Utc>,
    ) -> Result<TimeWindow, GridmixError> {
        let rules = self.rules()?;
        let encoded_end = Self::latest_encoded(&rules, max_end)?;
        if encoded_end <= records_start {
            return Err(GridmixError::invalid_arg(format!(
                "pattern selects no data: records only start at {}",
                records_start.to_rfc3339()
            )));
        }
        let earliest = self.earliest(records_start)?;
        if earliest >= max_end {
            return Err(GridmixError::invalid_arg(format!(
                "pattern selects no data: records are only available until {}",
                max_end.to_rfc3339()
            )));
        }
        TimeWindow::new(
            earliest.max(records_start),
            encoded_end.min(max_end).max(records_start),
        )
    }
}
