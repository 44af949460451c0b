//! Re-export of foundational types from `gridmix-types`.
// Consolidated re-exports so downstream crates can depend on `gridmix-core` only

pub use gridmix_types::{
    Area, AttributionStrategy, BreakdownRow, CacheConfig, CacheMetadata, DOCUMENT_FLOW,
    DOCUMENT_GENERATION, FLOW_COLUMN, GapPeriod, GapReport, Granularity, GridmixConfig,
    GridmixError, MAX_CHUNK_DAYS, MixReport, PROCESS_REALISED, Point, Provenance, PsrType,
    SeriesKey, SourceShare, Table, TimeWindow, UNKNOWN_PSR, is_psr_code, label_for, records_start,
};
