use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use gridmix_cache::{CacheStore, FileStore, KeyLocks};
use gridmix_core::timeseries::normalize::floor_to_hour;
use gridmix_core::{
    AttributionStrategy, CacheConfig, Granularity, GridmixConfig, GridmixError, MAX_CHUNK_DAYS,
    SeriesSource, max_end_exclusive,
};

/// Source of the current time; injectable so tests can pin "now".
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Orchestrator that serves generation and flow series through a cache and
/// computes Portugal's attributed electricity mix.
pub struct Gridmix {
    pub(crate) source: Arc<dyn SeriesSource>,
    pub(crate) store: Arc<dyn CacheStore>,
    pub(crate) locks: KeyLocks,
    pub(crate) cfg: GridmixConfig,
    pub(crate) clock: Clock,
}

/// Builder for constructing a `Gridmix` orchestrator with custom configuration.
pub struct GridmixBuilder {
    source: Option<Arc<dyn SeriesSource>>,
    store: Option<Arc<dyn CacheStore>>,
    cfg: GridmixConfig,
    clock: Option<Clock>,
}

impl Default for GridmixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridmixBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Behavior and trade-offs:
    /// - Starts without a source; you must register one via [`Self::with_source`].
    /// - Without an explicit store, entries are written under `.data_cache`
    ///   relative to the working directory.
    /// - Defaults follow the upstream API limits: yearly chunks, a 60s timeout
    ///   per chunk and no overall deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            store: None,
            cfg: GridmixConfig::default(),
            clock: None,
        }
    }

    /// Register the remote source every cache miss is fetched from.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SeriesSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Use a custom cache store.
    ///
    /// Overrides any directory set with [`Self::cache_dir`].
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Keep cache files under `dir`.
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.store = Some(Arc::new(FileStore::new(dir)));
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: GridmixConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Earliest hour requests may start at.
    #[must_use]
    pub const fn records_start(mut self, start: DateTime<Utc>) -> Self {
        self.cfg.records_start = start;
        self
    }

    /// Maximum span of one remote request, in days.
    ///
    /// Behavior and trade-offs:
    /// - The upstream API refuses spans longer than a year, so values above
    ///   365 are rejected by [`Self::build`].
    /// - Smaller chunks mean more requests but smaller payloads per call.
    #[must_use]
    pub const fn chunk_days(mut self, days: u32) -> Self {
        self.cfg.chunk_days = days;
        self
    }

    /// Set the per-chunk request timeout.
    ///
    /// A chunk that exceeds it fails the whole bundle with `ProviderTimeout`.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for bundle fetches.
    ///
    /// When exceeded, returns a `RequestTimeout` error and nothing further is
    /// written to the cache by the abandoned fetches.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Default attribution strategy for mix requests.
    #[must_use]
    pub const fn strategy(mut self, strategy: AttributionStrategy) -> Self {
        self.cfg.strategy = strategy;
        self
    }

    /// Default aggregation bucket for mix requests.
    #[must_use]
    pub const fn granularity(mut self, granularity: Granularity) -> Self {
        self.cfg.granularity = granularity;
        self
    }

    /// Timezone used to draw daily, weekly and monthly buckets.
    #[must_use]
    pub const fn timezone(mut self, tz: Tz) -> Self {
        self.cfg.timezone = Some(tz);
        self
    }

    /// Replace the wall clock.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the `Gridmix` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no source has been registered, if `chunk_days`
    /// is outside `1..=365`, if a timeout is zero, or if `records_start` is
    /// not on a whole hour.
    pub fn build(self) -> Result<Gridmix, GridmixError> {
        let Some(source) = self.source else {
            return Err(GridmixError::invalid_arg(
                "no source registered; add one via with_source(...)",
            ));
        };
        if !(1..=MAX_CHUNK_DAYS).contains(&self.cfg.chunk_days) {
            return Err(GridmixError::invalid_arg(format!(
                "chunk_days must be within 1..={MAX_CHUNK_DAYS}, got {}",
                self.cfg.chunk_days
            )));
        }
        if self.cfg.provider_timeout.is_zero() {
            return Err(GridmixError::invalid_arg("provider_timeout must be positive"));
        }
        if self.cfg.request_timeout.is_some_and(|d| d.is_zero()) {
            return Err(GridmixError::invalid_arg("request_timeout must be positive"));
        }
        if floor_to_hour(self.cfg.records_start) != self.cfg.records_start {
            return Err(GridmixError::invalid_arg(format!(
                "records_start {} is not on a whole hour",
                self.cfg.records_start.to_rfc3339()
            )));
        }

        let store = self.store.unwrap_or_else(|| {
            Arc::new(FileStore::from_config(&CacheConfig::default())) as Arc<dyn CacheStore>
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(Utc::now) as Clock);
        Ok(Gridmix {
            source,
            store,
            locks: KeyLocks::new(),
            cfg: self.cfg,
            clock,
        })
    }
}

/// Race `fut` against an optional overall deadline.
///
/// # Errors
/// Returns `RequestTimeout("request")` when the deadline elapses first; call
/// sites remap the label to their operation.
pub(crate) async fn with_request_deadline<F, T>(
    deadline: Option<Duration>,
    fut: F,
) -> Result<T, GridmixError>
where
    F: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| GridmixError::request_timeout("request")),
        None => Ok(fut.await),
    }
}

impl Gridmix {
    /// Wrap a source future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gridmix::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, GridmixError>
    where
        Fut: core::future::Future<Output = Result<T, GridmixError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(GridmixError::provider_timeout(connector_name, capability)))
    }

    /// Start building a new `Gridmix` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use gridmix_entsoe::EntsoeConnector;
    ///
    /// let entsoe = Arc::new(EntsoeConnector::from_env()?);
    /// let gm = gridmix::Gridmix::builder()
    ///     .with_source(entsoe)
    ///     .cache_dir(".data_cache")
    ///     .strategy(gridmix::AttributionStrategy::Discriminated)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> GridmixBuilder {
        GridmixBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GridmixConfig {
        &self.cfg
    }

    /// Current time according to the configured clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Latest exclusive end a request may use right now.
    #[must_use]
    pub fn max_end(&self) -> DateTime<Utc> {
        max_end_exclusive(self.now())
    }
}
