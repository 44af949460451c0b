//! Request window limits.

use chrono::{DateTime, TimeDelta, Utc};

use crate::timeseries::normalize::floor_to_hour;
use crate::{GridmixError, TimeWindow};

/// Latest exclusive end a request may use: `now` floored to the hour.
#[must_use]
pub const fn max_end_exclusive(now: DateTime<Utc>) -> DateTime<Utc> {
    floor_to_hour(now)
}

/// Check that `window` is a whole number of hours inside `[records_start, max_end)`.
///
/// # Errors
/// Returns `InvalidArg` naming the violated bound when the window starts
/// before `records_start`, ends after `max_end`, is shorter than one hour, or
/// is not aligned to whole hours.
pub fn validate_window(
    window: TimeWindow,
    records_start: DateTime<Utc>,
    max_end: DateTime<Utc>,
) -> Result<(), GridmixError> {
    if window.start < records_start {
        return Err(GridmixError::invalid_arg(format!(
            "start {} is before the records start {}",
            window.start.to_rfc3339(),
            records_start.to_rfc3339()
        )));
    }
    if window.end > max_end {
        return Err(GridmixError::invalid_arg(format!(
            "end {} is after the latest available hour {}",
            window.end.to_rfc3339(),
            max_end.to_rfc3339()
        )));
    }
    if window.duration() < TimeDelta::hours(1) {
        return Err(GridmixError::invalid_arg(format!(
            "window {window} is shorter than the minimum of one hour"
        )));
    }
    if floor_to_hour(window.start) != window.start || floor_to_hour(window.end) != window.end {
        return Err(GridmixError::invalid_arg(format!(
            "window {window} is not aligned to whole hours"
        )));
    }
    Ok(())
}
