//! Half-open UTC time windows.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GridmixError;

/// A half-open interval `[start, end)` in UTC.
///
/// Used both for request windows and for cache coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window, rejecting empty or inverted intervals.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, GridmixError> {
        if end <= start {
            return Err(GridmixError::invalid_arg(format!(
                "end ({end}) must be after start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True if `ts` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    /// True if `other` lies entirely within this window.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Smallest window spanning both inputs (gaps between them included).
    #[must_use]
    pub fn hull(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
