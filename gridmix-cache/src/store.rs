use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gridmix_core::{CacheConfig, CacheMetadata, GridmixError, Point, SeriesKey, TimeWindow};
use tokio::sync::Mutex;

use crate::codec::ColumnarSeries;

const DATA_SUFFIX: &str = ".json";
const METADATA_SUFFIX: &str = "_metadata.json";
const TMP_SUFFIX: &str = ".tmp";

/// A series loaded from the cache together with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSeries {
    /// Points sorted by start time.
    pub points: Vec<Point>,
    /// Coverage and provenance of the entry.
    pub metadata: CacheMetadata,
}

impl CachedSeries {
    /// Covered interval of the entry.
    #[must_use]
    pub const fn coverage(&self) -> TimeWindow {
        self.metadata.coverage()
    }
}

/// Persistent store holding one entry per series key.
///
/// A miss is `Ok(None)`, never an error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the entry for `key`.
    async fn load(&self, key: SeriesKey) -> Result<Option<CachedSeries>, GridmixError>;

    /// Replace the entry for `key` with `points` covering `coverage`.
    async fn save(
        &self,
        key: SeriesKey,
        points: &[Point],
        coverage: TimeWindow,
    ) -> Result<(), GridmixError>;

    /// Remove the entry for `key`, if any.
    async fn reset(&self, key: SeriesKey) -> Result<(), GridmixError>;

    /// Remove every entry.
    async fn reset_all(&self) -> Result<(), GridmixError>;
}

/// File-backed store: `<name>.json` holds columnar data and
/// `<name>_metadata.json` holds the coverage.
///
/// Saves invalidate the metadata first, then write data and metadata through
/// a temporary file and a rename, so a half-written entry never loads as
/// valid. Unreadable entries are purged and reported as misses.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the configured cache directory.
    #[must_use]
    pub fn from_config(cfg: &CacheConfig) -> Self {
        Self::new(cfg.dir.clone())
    }

    /// Root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the data file for `key`.
    #[must_use]
    pub fn data_path(&self, key: SeriesKey) -> PathBuf {
        self.dir.join(format!("{}{DATA_SUFFIX}", key.cache_name()))
    }

    /// Path of the metadata file for `key`.
    #[must_use]
    pub fn metadata_path(&self, key: SeriesKey) -> PathBuf {
        self.dir.join(format!("{}{METADATA_SUFFIX}", key.cache_name()))
    }

    async fn remove_if_exists(key: SeriesKey, path: &Path) -> Result<(), GridmixError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GridmixError::cache(
                key.cache_name(),
                format!("remove {}: {e}", path.display()),
            )),
        }
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TMP_SUFFIX);
        PathBuf::from(tmp)
    }

    async fn write_atomic(key: SeriesKey, path: &Path, bytes: Vec<u8>) -> Result<(), GridmixError> {
        let tmp = Self::tmp_path(path);
        let io_err = |op: &str, e: std::io::Error| {
            GridmixError::cache(key.cache_name(), format!("{op} {}: {e}", path.display()))
        };
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| io_err("write", e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| io_err("rename", e))
    }

    /// Read a file, mapping "not found" to `None`.
    async fn read_optional(key: SeriesKey, path: &Path) -> Result<Option<Vec<u8>>, GridmixError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GridmixError::cache(
                key.cache_name(),
                format!("read {}: {e}", path.display()),
            )),
        }
    }

    /// Drop a corrupted entry and report it as a miss.
    async fn purge(&self, key: SeriesKey, reason: &str) -> Result<Option<CachedSeries>, GridmixError> {
        #[cfg(feature = "tracing")]
        tracing::warn!(key = %key, reason, "purging corrupted cache entry");
        #[cfg(not(feature = "tracing"))]
        let _ = reason;
        self.reset(key).await?;
        Ok(None)
    }
}

#[async_trait]
impl CacheStore for FileStore {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gridmix_cache::load", skip(self, key), fields(key = %key))
    )]
    async fn load(&self, key: SeriesKey) -> Result<Option<CachedSeries>, GridmixError> {
        let Some(meta_bytes) = Self::read_optional(key, &self.metadata_path(key)).await? else {
            return Ok(None);
        };
        let metadata: CacheMetadata = match serde_json::from_slice(&meta_bytes) {
            Ok(m) => m,
            Err(e) => return self.purge(key, &format!("metadata: {e}")).await,
        };
        if metadata.end_date_exclusive <= metadata.start_date_inclusive {
            return self.purge(key, "metadata: empty coverage").await;
        }

        let Some(data_bytes) = Self::read_optional(key, &self.data_path(key)).await? else {
            return self.purge(key, "data file missing").await;
        };
        let columns: ColumnarSeries = match serde_json::from_slice(&data_bytes) {
            Ok(c) => c,
            Err(e) => return self.purge(key, &format!("data: {e}")).await,
        };
        let points = match columns.into_points() {
            Ok(p) => p,
            Err(e) => return self.purge(key, &e.to_string()).await,
        };
        let coverage = metadata.coverage();
        if points.iter().any(|p| !coverage.contains(p.start_time)) {
            return self.purge(key, "data outside coverage").await;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(key = %key, coverage = %coverage, points = points.len(), "cache entry loaded");
        Ok(Some(CachedSeries { points, metadata }))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gridmix_cache::save",
            skip(self, key, points, coverage),
            fields(key = %key, start = %coverage.start, end = %coverage.end, points = points.len())
        )
    )]
    async fn save(
        &self,
        key: SeriesKey,
        points: &[Point],
        coverage: TimeWindow,
    ) -> Result<(), GridmixError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            GridmixError::cache(key.cache_name(), format!("create {}: {e}", self.dir.display()))
        })?;

        let data = serde_json::to_vec(&ColumnarSeries::from_points(points))
            .map_err(|e| GridmixError::cache(key.cache_name(), format!("encode data: {e}")))?;
        let meta = serde_json::to_vec_pretty(&CacheMetadata::new(key, coverage))
            .map_err(|e| GridmixError::cache(key.cache_name(), format!("encode metadata: {e}")))?;

        let meta_path = self.metadata_path(key);
        Self::remove_if_exists(key, &meta_path).await?;
        Self::write_atomic(key, &self.data_path(key), data).await?;
        Self::write_atomic(key, &meta_path, meta).await
    }

    async fn reset(&self, key: SeriesKey) -> Result<(), GridmixError> {
        for path in [self.metadata_path(key), self.data_path(key)] {
            Self::remove_if_exists(key, &path).await?;
            Self::remove_if_exists(key, &Self::tmp_path(&path)).await?;
        }
        Ok(())
    }

    /// Remove the entries of every known series. Other files in the
    /// directory are left alone.
    async fn reset_all(&self) -> Result<(), GridmixError> {
        for key in SeriesKey::all() {
            self.reset(key).await?;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(dir = %self.dir.display(), "cache cleared");
        Ok(())
    }
}

/// In-memory store, useful for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<SeriesKey, CachedSeries>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True when no entry is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn load(&self, key: SeriesKey) -> Result<Option<CachedSeries>, GridmixError> {
        Ok(self.entries.lock().await.get(&key).cloned())
    }

    async fn save(
        &self,
        key: SeriesKey,
        points: &[Point],
        coverage: TimeWindow,
    ) -> Result<(), GridmixError> {
        let entry = CachedSeries {
            points: points.to_vec(),
            metadata: CacheMetadata::new(key, coverage),
        };
        self.entries.lock().await.insert(key, entry);
        Ok(())
    }

    async fn reset(&self, key: SeriesKey) -> Result<(), GridmixError> {
        self.entries.lock().await.remove(&key);
        Ok(())
    }

    async fn reset_all(&self) -> Result<(), GridmixError> {
        self.entries.lock().await.clear();
        Ok(())
    }
}
