use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use gridmix_core::{GridmixError, Point, SeriesKey, SeriesSource, TimeWindow};

use crate::synthetic_points;

/// Instruction for how a fetch should behave for a given series.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Serve the slice of these points that falls in the requested window.
    Return(Vec<Point>),
    /// Fail immediately with the provided error.
    Fail(GridmixError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<SeriesKey, MockBehavior>,
    chunk_failures: Vec<(SeriesKey, DateTime<Utc>, GridmixError)>,
    calls: Vec<(SeriesKey, TimeWindow)>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for every fetch of `key`.
    pub async fn set_behavior(&self, key: SeriesKey, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(key, behavior);
    }

    /// Fail only the fetches of `key` whose window contains `ts`.
    ///
    /// Takes precedence over the behavior set for the key.
    pub async fn fail_chunk_containing(
        &self,
        key: SeriesKey,
        ts: DateTime<Utc>,
        error: GridmixError,
    ) {
        let mut guard = self.state.lock().await;
        guard.chunk_failures.push((key, ts, error));
    }

    /// Every fetch received so far, in arrival order.
    pub async fn calls(&self) -> Vec<(SeriesKey, TimeWindow)> {
        self.state.lock().await.calls.clone()
    }

    /// Windows fetched for `key`, sorted by start.
    pub async fn calls_for(&self, key: SeriesKey) -> Vec<TimeWindow> {
        let guard = self.state.lock().await;
        let mut out: Vec<TimeWindow> = guard
            .calls
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, w)| *w)
            .collect();
        out.sort_by_key(|w| w.start);
        out
    }

    /// Forget recorded calls but keep behaviors.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.chunk_failures.clear();
        guard.calls.clear();
    }
}

/// A source that defers behavior to an external controller and records
/// every request.
///
/// Keys without a configured behavior are served from the deterministic
/// synthetic data of [`crate::MockSource`].
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn SeriesSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn SeriesSource>, controller)
    }
}

#[async_trait]
impl SeriesSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    async fn fetch_chunk(
        &self,
        key: SeriesKey,
        window: TimeWindow,
    ) -> Result<Vec<Point>, GridmixError> {
        // Log the request and take a behavior snapshot without holding the
        // lock across await points.
        let (behavior, failure) = {
            let mut guard = self.state.lock().await;
            guard.calls.push((key, window));
            let failure = guard
                .chunk_failures
                .iter()
                .find(|(k, ts, _)| *k == key && window.contains(*ts))
                .map(|(_, _, e)| e.clone());
            (guard.rules.get(&key).cloned(), failure)
        };

        if let Some(e) = failure {
            return Err(e);
        }
        match behavior {
            Some(MockBehavior::Return(points)) => Ok(points
                .into_iter()
                .filter(|p| window.contains(p.start_time))
                .collect()),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Ok(synthetic_points(key, window)),
        }
    }
}
