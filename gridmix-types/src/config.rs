//! Configuration types shared by the orchestrator and connectors.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Unix timestamp of 2015-01-01T00:00:00Z, the first hour published by ENTSO-E.
const RECORDS_START_TS: i64 = 1_420_070_400;

/// Maximum span of a single remote request, in days.
pub const MAX_CHUNK_DAYS: u32 = 365;

/// First hour for which records exist upstream.
#[must_use]
pub fn records_start() -> DateTime<Utc> {
    DateTime::from_timestamp(RECORDS_START_TS, 0).unwrap_or_default()
}

/// How imported power is attributed to the exporting country's mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttributionStrategy {
    /// PT and ES only; France is ignored.
    TwoCountry,
    /// Attribute FR into ES first, then the adjusted ES into PT.
    #[default]
    Chain,
    /// Keep the PT, ES and FR contributions to Portugal separate.
    Discriminated,
}

/// Calendar bucket used when aggregating hourly results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Granularity {
    /// Keep hourly rows.
    #[default]
    Hourly,
    /// Mean per calendar day.
    Daily,
    /// Mean per ISO week, starting Monday.
    Weekly,
    /// Mean per calendar month.
    Monthly,
}

/// Location of the on-disk cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one data file and one metadata file per series.
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".data_cache"),
        }
    }
}

/// Global configuration for the `Gridmix` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridmixConfig {
    /// Earliest hour that may be requested.
    pub records_start: DateTime<Utc>,
    /// Maximum span of one remote request in days (1..=365).
    pub chunk_days: u32,
    /// Timeout applied to each remote chunk.
    pub provider_timeout: Duration,
    /// Optional deadline for a whole bundle fetch.
    pub request_timeout: Option<Duration>,
    /// Default attribution strategy for mix requests.
    pub strategy: AttributionStrategy,
    /// Default aggregation bucket for mix requests.
    pub granularity: Granularity,
    /// Timezone used to draw calendar buckets; UTC when unset.
    pub timezone: Option<Tz>,
}

impl Default for GridmixConfig {
    fn default() -> Self {
        Self {
            records_start: records_start(),
            chunk_days: MAX_CHUNK_DAYS,
            provider_timeout: Duration::from_secs(60),
            request_timeout: None,
            strategy: AttributionStrategy::default(),
            granularity: Granularity::default(),
            timezone: None,
        }
    }
}
