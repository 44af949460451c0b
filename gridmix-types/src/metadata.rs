//! Persisted cache metadata and fetch provenance.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::series_key::SeriesKey;
use crate::window::TimeWindow;

/// Metadata record stored next to each cached series.
///
/// The coverage is written as RFC 3339 timestamps; the remaining request
/// parameters are flattened into the same JSON object for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Inclusive start of the covered interval.
    pub start_date_inclusive: DateTime<Utc>,
    /// Exclusive end of the covered interval.
    pub end_date_exclusive: DateTime<Utc>,
    /// Request parameters that produced the entry (`documentType`, domains, ...).
    #[serde(flatten)]
    pub params: BTreeMap<String, String>,
}

impl CacheMetadata {
    /// Metadata for `key` covering `coverage`.
    #[must_use]
    pub fn new(key: SeriesKey, coverage: TimeWindow) -> Self {
        Self {
            start_date_inclusive: coverage.start,
            end_date_exclusive: coverage.end,
            params: key
                .request_params()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// The covered interval.
    #[must_use]
    pub const fn coverage(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_date_inclusive,
            end: self.end_date_exclusive,
        }
    }
}

/// Where each part of a served series came from.
///
/// Built while reconciling a request against the cache; useful for asserting
/// fetch minimality and for debugging stale entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Series the provenance refers to.
    pub key: SeriesKey,
    /// Coverage of the cache entry before the request, if any.
    pub cached: Option<TimeWindow>,
    /// Windows fetched from the remote source, in chronological order.
    pub fetched: Vec<TimeWindow>,
    /// Coverage of the cache entry after the request, if any.
    pub coverage: Option<TimeWindow>,
}

impl Provenance {
    /// Create an empty provenance record for `key`.
    #[must_use]
    pub const fn new(key: SeriesKey) -> Self {
        Self {
            key,
            cached: None,
            fetched: Vec::new(),
            coverage: None,
        }
    }

    /// True when the request was answered without any remote call.
    #[must_use]
    pub fn served_from_cache(&self) -> bool {
        self.fetched.is_empty()
    }
}
