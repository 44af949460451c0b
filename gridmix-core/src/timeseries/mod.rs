//! Time-series utilities shared by connectors and the orchestrator.
//!
//! Modules include:
//! - `normalize`: average duplicates, resample to hourly and pivot to tables
//! - `merge`: fetched-wins merge of cached and fresh points
//! - `gaps`: detect missing hourly slots
//! - `aggregate`: calendar-bucket means for result tables
/// Calendar-bucket aggregation of hourly tables.
pub mod aggregate;
/// Missing-slot detection for hourly series.
pub mod gaps;
/// Merge utilities for cached and freshly fetched points.
pub mod merge;
/// Duplicate averaging, hourly resampling and pivoting.
pub mod normalize;
