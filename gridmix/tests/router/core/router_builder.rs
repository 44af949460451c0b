use std::sync::Arc;
use std::time::Duration;

use crate::helpers::{dt, fixed_clock, now};
use gridmix::{AttributionStrategy, Gridmix, GridmixConfig, GridmixError};
use gridmix_mock::MockSource;

fn base() -> gridmix::GridmixBuilder {
    Gridmix::builder()
        .with_source(Arc::new(MockSource::new()))
        .with_store(Arc::new(gridmix::MemoryStore::new()))
}

#[test]
fn build_requires_a_source() {
    let err = Gridmix::builder().build().err().unwrap();
    assert!(matches!(err, GridmixError::InvalidArg(_)));
}

#[test]
fn chunk_days_must_stay_within_a_year() {
    for days in [0, 366] {
        let err = base().chunk_days(days).build().err().unwrap();
        assert!(err.to_string().contains("chunk_days"), "{err}");
    }
    assert!(base().chunk_days(365).build().is_ok());
    assert!(base().chunk_days(1).build().is_ok());
}

#[test]
fn zero_timeouts_are_rejected() {
    assert!(base().provider_timeout(Duration::ZERO).build().is_err());
    assert!(base().request_timeout(Duration::ZERO).build().is_err());
}

#[test]
fn records_start_must_be_on_the_hour() {
    let err = base()
        .records_start(dt(2020, 1, 1, 0) + chrono::TimeDelta::minutes(1))
        .build()
        .err()
        .unwrap();
    assert!(err.is_validation());
}

#[test]
fn defaults_match_upstream_limits() {
    let gm = base().build().unwrap();
    let cfg: &GridmixConfig = gm.config();
    assert_eq!(cfg.chunk_days, 365);
    assert_eq!(cfg.provider_timeout, Duration::from_secs(60));
    assert_eq!(cfg.request_timeout, None);
    assert_eq!(cfg.strategy, AttributionStrategy::Chain);
    assert_eq!(cfg.records_start, dt(2015, 1, 1, 0));
}

#[test]
fn max_end_is_the_current_hour_floor() {
    let gm = base().clock(fixed_clock()).build().unwrap();
    assert_eq!(gm.now(), now());
    assert_eq!(gm.max_end(), dt(2024, 6, 10, 12));
}
