//! gridmix-core
//!
//! Core types, traits, and algorithms shared across the gridmix workspace.
//!
//! - `types`: re-exported data structures (areas, series keys, points, tables).
//! - `connector`: the `SeriesSource` trait implemented by remote sources.
//! - `timeseries`: normalization, merging, gap detection and aggregation.
//! - `reconcile`: fetch planning against cached coverage.
//! - `pattern`: recurring time patterns.
//! - `mix`: cross-border attribution and result shaping.
//!
//! Everything here is synchronous and side-effect free except the
//! `SeriesSource` trait, which is async and assumes a Tokio runtime in
//! implementors.
#![warn(missing_docs)]

/// Request window limits.
pub mod bounds;
/// Aligned input bundle for attribution.
pub mod bundle;
/// The `SeriesSource` trait.
pub mod connector;
/// Polars export of result tables.
#[cfg(feature = "dataframe")]
pub mod dataframe;
/// Mix attribution and result shaping.
pub mod mix;
/// Recurring time patterns.
pub mod pattern;
/// Fetch planning against cached coverage.
pub mod reconcile;
/// Time-series utilities for normalizing and merging series.
pub mod timeseries;
/// Foundational types re-exported from `gridmix-types`.
pub mod types;

pub use bounds::{max_end_exclusive, validate_window};
pub use bundle::{DataBundle, assert_aligned};
pub use connector::SeriesSource;
pub use mix::attribution::{Attribution, OriginParts, attribute, spain_mix};
pub use pattern::{PatternRules, TimePattern};
pub use reconcile::{FetchPlan, PlanKind, chunk_windows, extend_coverage, plan_fetch};
pub use timeseries::gaps::detect_gaps;
pub use timeseries::merge::{filter_window, merge_prefer_fetched};
pub use timeseries::normalize::{pivot, resample_to_hourly};
pub use types::*;
