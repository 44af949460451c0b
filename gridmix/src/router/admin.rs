use gridmix_core::timeseries::merge::distinct_starts;
use gridmix_core::{GapReport, GridmixError, SeriesKey, TimeWindow, detect_gaps, filter_window};

use crate::Gridmix;
use crate::router::util::try_join_with_deadline;

impl Gridmix {
    /// Delete every cache entry.
    ///
    /// # Errors
    /// Returns `Cache` when the store cannot remove an entry.
    pub async fn reset_cache(&self) -> Result<(), GridmixError> {
        #[cfg(feature = "tracing")]
        tracing::info!("resetting cache");
        self.store.reset_all().await
    }

    /// Delete the cache entry of one series.
    ///
    /// # Errors
    /// Returns `Cache` when the store cannot remove the entry.
    pub async fn reset_series(&self, key: SeriesKey) -> Result<(), GridmixError> {
        let _guard = self.locks.lock(key).await;
        self.store.reset(key).await
    }

    /// Fill the cache with all seven series from the records start up to the
    /// latest available hour.
    ///
    /// Existing entries are only extended; covered history is not fetched again.
    ///
    /// # Errors
    /// Propagates the first source, timeout or cache error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gridmix::admin::initialize_cache", skip(self))
    )]
    pub async fn initialize_cache(&self) -> Result<(), GridmixError> {
        let window = TimeWindow::new(self.cfg.records_start, self.max_end())?;
        let tasks = SeriesKey::BUNDLE
            .into_iter()
            .map(|key| async move { self.reconcile_series(key, window).await.map(|_| ()) });
        try_join_with_deadline("initialize_cache", tasks, self.cfg.request_timeout).await?;
        Ok(())
    }

    /// Coverage of the cache entry of `key`, if any.
    ///
    /// # Errors
    /// Returns `Cache` on unrecoverable read failures.
    pub async fn cached_coverage(&self, key: SeriesKey) -> Result<Option<TimeWindow>, GridmixError> {
        let _guard = self.locks.lock(key).await;
        Ok(self.store.load(key).await?.map(|c| c.coverage()))
    }

    /// Report missing hours of the cached series `key` within `window`.
    ///
    /// Reads the cache only; nothing is fetched. A series with no cache entry
    /// reports every hour as missing.
    ///
    /// # Errors
    /// Returns `Cache` on unrecoverable read failures.
    pub async fn gap_report(&self, key: SeriesKey, window: TimeWindow) -> Result<GapReport, GridmixError> {
        let points = {
            let _guard = self.locks.lock(key).await;
            self.store
                .load(key)
                .await?
                .map(|c| c.points)
                .unwrap_or_default()
        };
        let index = distinct_starts(&filter_window(points, window));
        let mut report = detect_gaps(&index, window);
        report.key = Some(key);
        Ok(report)
    }
}
