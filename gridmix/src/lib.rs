//! Gridmix serves ENTSO-E generation and cross-border flow series for
//! Portugal, Spain and France through a local cache, and attributes imports
//! to compute Portugal's electricity mix.
//!
//! Overview
//! - Fetches per-country generation and directed flows from a `SeriesSource`
//!   (the ENTSO-E connector in production, a mock in tests and demos).
//! - Keeps one cache entry per series with a contiguous coverage interval and
//!   only asks the source for hours the cache does not hold.
//! - Normalizes every series to an hourly grid and aligns a bundle of series
//!   on one index before attribution.
//! - Attributes Portugal's mix with the two-country, chain or discriminated
//!   strategy and shapes the result into percentages, summaries and
//!   per-origin breakdowns.
//!
//! Key behaviors and trade-offs
//! - Cache reconciliation:
//!   - A request inside the cached coverage issues no remote call.
//!   - A request past the coverage end fetches `[coverage end, request end)`;
//!     a request before the coverage start also fetches the backward gap so
//!     coverage stays one interval.
//!   - Coverage never shrinks and is derived from the data actually returned.
//! - Chunking: remote requests span at most `chunk_days` days (365 by
//!   default, the upstream limit). Chunks run concurrently and are
//!   concatenated in chronological order.
//! - Failures: any failed or timed-out chunk fails the whole bundle and
//!   nothing is written to the cache for that series.
//! - Alignment: series of one bundle must share their hourly index. A
//!   mismatch is returned as `IndexMismatch` and never repaired.
//! - Validation: windows before the records start, past the current hour,
//!   shorter than one hour or not on whole hours are rejected before any I/O.
//!
//! Examples
//! Building an orchestrator against ENTSO-E:
//! ```rust,ignore
//! use std::sync::Arc;
//! use gridmix::{AttributionStrategy, Gridmix};
//! use gridmix_entsoe::EntsoeConnector;
//!
//! let gm = Gridmix::builder()
//!     .with_source(Arc::new(EntsoeConnector::from_env()?))
//!     .cache_dir(".data_cache")
//!     .strategy(AttributionStrategy::Discriminated)
//!     .build()?;
//! ```
//!
//! Computing the mix of a week and of a recurring pattern:
//! ```rust,ignore
//! use gridmix::{TimePattern, TimeWindow};
//!
//! let week = TimeWindow::new(start, start + chrono::TimeDelta::days(7))?;
//! let report = gm.compute_mix(week, true).await?;
//!
//! // Summer evenings of 2023
//! let evenings = TimePattern::new("2023", "6-8", "", "18-22");
//! let report = gm.compute_mix(evenings, true).await?;
//! ```
//!
//! See `gridmix/demos/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{Clock, Gridmix, GridmixBuilder};
pub use router::mix::MixQuery;
pub use router::util::try_join_with_deadline;

pub use gridmix_cache::{CacheStore, CachedSeries, FileStore, MemoryStore};

// Re-export core types for convenience
pub use gridmix_core::{
    Area,
    AttributionStrategy,
    BreakdownRow,
    CacheConfig,
    CacheMetadata,
    DataBundle,
    GapPeriod,
    GapReport,
    Granularity,
    GridmixConfig,
    GridmixError,
    MixReport,
    Point,
    Provenance,
    PsrType,
    SeriesKey,
    SeriesSource,
    SourceShare,
    Table,
    TimePattern,
    TimeWindow,
};
