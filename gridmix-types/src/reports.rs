//! Report envelopes produced by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::config::{AttributionStrategy, Granularity};
use crate::error::GridmixError;
use crate::frame::Table;
use crate::series_key::SeriesKey;
use crate::window::TimeWindow;

/// Mean contribution of one generation source over a whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceShare {
    /// Source label (e.g. `Solar`).
    pub source: String,
    /// Mean attributed power (MW).
    pub mean_mw: f64,
    /// Share of the summed mean power, in percent.
    pub percent: f64,
}

/// One row of the per-origin breakdown of Portugal's attributed mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    /// Country the power was generated in.
    pub origin: Area,
    /// Source label.
    pub source: String,
    /// Mean power over the request (MW).
    pub power_mw: f64,
    /// Share of this origin's own contribution, in percent.
    pub national_percent: f64,
    /// Share of the total attributed mix, in percent.
    pub global_percent: f64,
    /// Energy over the request (MWh).
    pub energy_mwh: f64,
    /// Energy formatted with a MWh/GWh/TWh unit.
    pub energy: String,
}

/// Result of a mix computation.
///
/// Tables are empty when no data exists for the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixReport {
    /// Window the data was fetched for.
    pub window: TimeWindow,
    /// Strategy used to attribute imports.
    pub strategy: AttributionStrategy,
    /// Bucket used for `power` and `percentages`.
    pub granularity: Granularity,
    /// Attributed power per source (MW), one row per bucket.
    pub power: Table,
    /// Attributed mix per source in percent, one row per bucket.
    pub percentages: Table,
    /// Spain's effective power per source (MW) after its exchange with
    /// France, or its own generation when France is excluded.
    pub spain_power: Table,
    /// Spain's effective mix per source in percent.
    pub spain_percentages: Table,
    /// Mean share per source over the whole request, largest first.
    pub summary: Vec<SourceShare>,
    /// Per-origin breakdown; only filled by the discriminated strategy.
    pub breakdown: Vec<BreakdownRow>,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<GridmixError>,
}

/// Contiguous run of missing hourly slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapPeriod {
    /// First missing hour.
    pub start: DateTime<Utc>,
    /// Last missing hour (inclusive).
    pub end: DateTime<Utc>,
    /// Number of missing hours in the run.
    pub hours: usize,
}

/// Missing-data summary for one series over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    /// Series the report refers to, when produced from the cache.
    pub key: Option<SeriesKey>,
    /// Window that was checked.
    pub window: TimeWindow,
    /// Hourly slots expected in the window.
    pub expected: usize,
    /// Hourly slots with no data.
    pub missing: usize,
    /// Share of expected slots present, in percent.
    pub coverage_percent: f64,
    /// Missing slots grouped into contiguous runs.
    pub gaps: Vec<GapPeriod>,
}

impl GapReport {
    /// True when every expected slot is present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.missing == 0
    }
}
