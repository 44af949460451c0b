//! Cross-border mix attribution and result shaping.
/// Attribution strategies over an aligned bundle.
pub mod attribution;
/// Percentages, time aggregation and per-origin breakdown.
pub mod summary;
