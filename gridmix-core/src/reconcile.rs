//! Decide what to fetch for a request given the coverage of the cache.

use chrono::TimeDelta;

use crate::{GridmixError, Point, TimeWindow};

/// How a request relates to the cached coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// No cache entry: fetch the whole request.
    Miss,
    /// Coverage spans the request: serve from cache.
    FullHit,
    /// Coverage overlaps the request: fetch the uncovered parts only.
    Partial,
    /// Coverage ends at or before the request start: fetch from the frontier.
    Frontier,
}

/// Sub-windows to fetch for one request, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    /// Classification of the request against the cache.
    pub kind: PlanKind,
    /// Windows to fetch; empty for a full hit.
    pub fetch: Vec<TimeWindow>,
}

impl FetchPlan {
    /// True when no remote call is needed.
    #[must_use]
    pub fn is_full_hit(&self) -> bool {
        self.fetch.is_empty()
    }
}

/// Compute the minimal fetch plan for `requested` against `cached` coverage.
///
/// - no cache: fetch `[rs, re)`
/// - `cs <= rs && ce >= re`: nothing to fetch
/// - otherwise fetch `[ce, re)` when `ce < re`, growing the cache forward from
///   its frontier without re-fetching covered history
/// - when `rs < cs`, the backward gap `[rs, cs)` is fetched as well so that
///   coverage stays a single contiguous interval
#[must_use]
pub fn plan_fetch(cached: Option<TimeWindow>, requested: TimeWindow) -> FetchPlan {
    let Some(cov) = cached else {
        return FetchPlan {
            kind: PlanKind::Miss,
            fetch: vec![requested],
        };
    };
    if cov.covers(&requested) {
        return FetchPlan {
            kind: PlanKind::FullHit,
            fetch: Vec::new(),
        };
    }

    let mut fetch = Vec::with_capacity(2);
    if requested.start < cov.start {
        fetch.push(TimeWindow {
            start: requested.start,
            end: cov.start,
        });
    }
    if cov.end < requested.end {
        fetch.push(TimeWindow {
            start: cov.end,
            end: requested.end,
        });
    }
    let kind = if cov.end > requested.start {
        PlanKind::Partial
    } else {
        PlanKind::Frontier
    };
    FetchPlan { kind, fetch }
}

/// Coverage after merging `fetched` points into an entry covering `previous`.
///
/// The new extent runs from the earliest fetched start to the latest fetched
/// end, joined with the previous coverage. Coverage never shrinks; with no
/// fetched points it is unchanged.
#[must_use]
pub fn extend_coverage(previous: Option<TimeWindow>, fetched: &[Point]) -> Option<TimeWindow> {
    let start = fetched.iter().map(|p| p.start_time).min();
    let end = fetched.iter().map(|p| p.end_time).max();
    let fresh = match (start, end) {
        (Some(start), Some(end)) => TimeWindow { start, end },
        _ => return previous,
    };
    Some(match previous {
        Some(prev) => prev.hull(&fresh),
        None => fresh,
    })
}

/// Split `window` into consecutive chunks of at most `chunk_days` days.
///
/// # Errors
/// Returns `InvalidArg` if `chunk_days` is zero.
pub fn chunk_windows(window: TimeWindow, chunk_days: u32) -> Result<Vec<TimeWindow>, GridmixError> {
    if chunk_days == 0 {
        return Err(GridmixError::invalid_arg("chunk_days must be positive"));
    }
    let step = TimeDelta::days(i64::from(chunk_days));
    let mut out = Vec::new();
    let mut start = window.start;
    while start < window.end {
        let end = (start + step).min(window.end);
        out.push(TimeWindow { start, end });
        start = end;
    }
    Ok(out)
}
