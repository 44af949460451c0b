use std::sync::Arc;

use gridmix_core::{
    GridmixError, Point, Provenance, SeriesKey, Table, TimeWindow, chunk_windows,
    extend_coverage, filter_window, merge_prefer_fetched, pivot, plan_fetch, resample_to_hourly,
};

use crate::Gridmix;

impl Gridmix {
    /// Fetch one series over `window` as an hourly table, going through the cache.
    ///
    /// Behavior:
    /// - Serves from the cache when its coverage spans `window`.
    /// - Otherwise fetches only the uncovered parts, split into chunks of at
    ///   most `chunk_days` days, merges them into the cache and returns the
    ///   requested slice.
    ///
    /// # Errors
    /// Propagates source, timeout, resolution and cache errors. Nothing is
    /// written to the cache when any chunk fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gridmix::series::fetch_series",
            skip(self, key, window),
            fields(key = %key, start = %window.start, end = %window.end),
        )
    )]
    pub async fn fetch_series(&self, key: SeriesKey, window: TimeWindow) -> Result<Table, GridmixError> {
        let (points, _) = self.reconcile_series(key, window).await?;
        Ok(pivot(&points))
    }

    /// Like [`Self::fetch_series`] but returns the normalized points along
    /// with a record of what was served from cache and what was fetched.
    ///
    /// # Errors
    /// Same as [`Self::fetch_series`].
    pub async fn fetch_series_with_provenance(
        &self,
        key: SeriesKey,
        window: TimeWindow,
    ) -> Result<(Vec<Point>, Provenance), GridmixError> {
        self.reconcile_series(key, window).await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gridmix::series::reconcile_series",
            skip(self, key, window),
            fields(key = %key, start = %window.start, end = %window.end),
        )
    )]
    pub(crate) async fn reconcile_series(
        &self,
        key: SeriesKey,
        window: TimeWindow,
    ) -> Result<(Vec<Point>, Provenance), GridmixError> {
        let _guard = self.locks.lock(key).await;

        let cached = self.store.load(key).await?;
        let previous = cached.as_ref().map(|c| c.coverage());
        let plan = plan_fetch(previous, window);
        let mut provenance = Provenance::new(key);
        provenance.cached = previous;
        provenance.coverage = previous;

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = ?plan.kind, windows = plan.fetch.len(), "fetch plan");

        let cached_points = cached.map(|c| c.points).unwrap_or_default();
        if plan.is_full_hit() {
            #[cfg(feature = "tracing")]
            tracing::debug!("cache hit");
            return Ok((filter_window(cached_points, window), provenance));
        }

        let fetched = self.fetch_windows(key, &plan.fetch).await?;
        let fetched = resample_to_hourly(fetched)?;
        provenance.fetched = plan.fetch;

        let coverage = extend_coverage(previous, &fetched);
        let any_fetched = !fetched.is_empty();
        let merged = merge_prefer_fetched(cached_points, fetched);
        if let Some(cov) = coverage
            && any_fetched
        {
            self.store.save(key, &merged, cov).await?;
        }
        provenance.coverage = coverage;

        Ok((filter_window(merged, window), provenance))
    }

    /// Fetch every window in chunks concurrently, concatenating the results in
    /// chronological order.
    async fn fetch_windows(
        &self,
        key: SeriesKey,
        windows: &[TimeWindow],
    ) -> Result<Vec<Point>, GridmixError> {
        let mut chunks = Vec::new();
        for w in windows {
            chunks.extend(chunk_windows(*w, self.cfg.chunk_days)?);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(chunks = chunks.len(), source = self.source.name(), "fetching chunks");

        let timeout = self.cfg.provider_timeout;
        let tasks = chunks.into_iter().map(|chunk| {
            let source = Arc::clone(&self.source);
            async move {
                let name = source.name();
                Self::provider_call_with_timeout(
                    name,
                    "fetch_chunk",
                    timeout,
                    source.fetch_chunk(key, chunk),
                )
                .await
            }
        });
        let parts = futures::future::try_join_all(tasks).await?;
        Ok(parts.into_iter().flatten().collect())
    }
}
