use async_trait::async_trait;

use crate::{GridmixError, Point, SeriesKey, TimeWindow};

/// Remote source of raw generation and flow series.
///
/// Implementations perform exactly one upstream request per call; chunking,
/// caching and normalization are handled by the orchestrator.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// A stable identifier used in errors and logs (e.g. "gridmix-entsoe").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Fetch the raw points of `key` whose start lies in `window`.
    ///
    /// Points may carry any resolution the upstream reports; an empty vector
    /// means the source has no data for the window.
    async fn fetch_chunk(
        &self,
        key: SeriesKey,
        window: TimeWindow,
    ) -> Result<Vec<Point>, GridmixError>;
}
