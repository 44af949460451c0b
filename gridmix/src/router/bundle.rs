use gridmix_core::{DataBundle, GridmixError, SeriesKey, Table, TimeWindow, validate_window};

use crate::Gridmix;
use crate::router::util::try_join_with_deadline;

/// Series a bundle needs, generation first so PT generation is the alignment
/// reference.
fn bundle_keys(include_france: bool) -> Vec<SeriesKey> {
    if include_france {
        SeriesKey::BUNDLE.to_vec()
    } else {
        vec![
            SeriesKey::GENERATION_PT,
            SeriesKey::GENERATION_ES,
            SeriesKey::FLOW_PT_TO_ES,
            SeriesKey::FLOW_ES_TO_PT,
        ]
    }
}

impl Gridmix {
    /// Fetch every series attribution needs over `window` and align them.
    ///
    /// Behavior:
    /// - The window is validated before any I/O.
    /// - Keys are fetched concurrently; each key is reconciled against the
    ///   cache under its own lock.
    /// - The first failure fails the bundle.
    /// - Tables must share one hourly index; a mismatch is returned as
    ///   `IndexMismatch` and never repaired.
    ///
    /// # Errors
    /// Returns `InvalidArg` for out-of-bounds windows, `RequestTimeout` when
    /// the configured request deadline elapses, and any source or cache error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gridmix::bundle::fetch_bundle",
            skip_all,
            fields(start = %window.start, end = %window.end, include_france = include_france),
        )
    )]
    pub async fn fetch_bundle(
        &self,
        window: TimeWindow,
        include_france: bool,
    ) -> Result<DataBundle, GridmixError> {
        validate_window(window, self.cfg.records_start, self.max_end())?;

        let tasks = bundle_keys(include_france).into_iter().map(|key| async move {
            let table: Table = self.fetch_series(key, window).await?;
            Ok((key, table))
        });
        let series = try_join_with_deadline("fetch_bundle", tasks, self.cfg.request_timeout).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(series = series.len(), "bundle fetched");

        DataBundle::assemble(series)
    }
}
