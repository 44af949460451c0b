//! Gridmix data transfer objects: errors, bidding areas, series keys, windows,
//! tables, cache metadata and configuration.
#![warn(missing_docs)]

mod area;
mod config;
mod error;
mod frame;
mod metadata;
mod psr;
mod reports;
mod series_key;
mod window;

pub use area::Area;
pub use config::{
    AttributionStrategy, CacheConfig, Granularity, GridmixConfig, MAX_CHUNK_DAYS, records_start,
};
pub use error::GridmixError;
pub use frame::{FLOW_COLUMN, Point, Table};
pub use metadata::{CacheMetadata, Provenance};
pub use psr::{PsrType, UNKNOWN_PSR, is_psr_code, label_for};
pub use reports::{BreakdownRow, GapPeriod, GapReport, MixReport, SourceShare};
pub use series_key::{DOCUMENT_FLOW, DOCUMENT_GENERATION, PROCESS_REALISED, SeriesKey};
pub use window::TimeWindow;
