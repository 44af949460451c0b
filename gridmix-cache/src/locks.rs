use std::collections::HashMap;
use std::sync::Arc;

use gridmix_core::SeriesKey;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async mutex map: one lock per series.
///
/// Holding the guard serializes load-reconcile-save cycles on a key while
/// other keys proceed concurrently.
#[derive(Debug, Default)]
pub struct KeyLocks {
    inner: std::sync::Mutex<HashMap<SeriesKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Create an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: SeriesKey) -> Arc<Mutex<()>> {
        let mut map = match self.inner.lock() {
            Ok(guard) => guard,
            // The map only holds Arcs; a poisoned guard is still consistent.
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(map.entry(key).or_default())
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: SeriesKey) -> OwnedMutexGuard<()> {
        self.slot(key).lock_owned().await
    }
}
