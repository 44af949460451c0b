//! Query parameters for the ENTSO-E REST API.

use chrono::{DateTime, Utc};
use gridmix_core::{SeriesKey, TimeWindow};

/// `periodStart`/`periodEnd` format (`YYYYMMDDHHMM`, UTC).
pub const PERIOD_FORMAT: &str = "%Y%m%d%H%M";

/// Format a timestamp for `periodStart`/`periodEnd`.
#[must_use]
pub fn format_period(ts: DateTime<Utc>) -> String {
    ts.format(PERIOD_FORMAT).to_string()
}

/// Full query for one chunk, security token last.
#[must_use]
pub fn query_pairs(key: SeriesKey, window: TimeWindow, token: &str) -> Vec<(&'static str, String)> {
    let mut pairs = key.request_params();
    pairs.push(("periodStart", format_period(window.start)));
    pairs.push(("periodEnd", format_period(window.end)));
    pairs.push(("securityToken", token.to_string()));
    pairs
}
