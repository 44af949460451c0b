use std::sync::Arc;

use chrono::TimeDelta;
use proptest::prelude::*;

use gridmix::{Gridmix, MemoryStore, SeriesKey, TimeWindow};
use gridmix_mock::DynamicMockSource;

use crate::helpers::{dt, fixed_clock};

fn arb_window() -> impl Strategy<Value = (i64, i64)> {
    (0i64..48, 1i64..12).prop_map(|(start, len)| (start, (start + len).min(60)))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 40, .. ProptestConfig::default() })]
    #[test]
    fn reconciliation_model_holds(requests in proptest::collection::vec(arb_window(), 1..12)) {
        tokio_test::block_on(async move {
            let (source, ctl) = DynamicMockSource::new_with_controller("prop");
            let gm = Gridmix::builder()
                .with_source(source)
                .with_store(Arc::new(MemoryStore::new()))
                .clock(fixed_clock())
                .build()
                .unwrap();
            let key = SeriesKey::FLOW_ES_TO_PT;
            let base = dt(2024, 6, 7, 0);

            let mut coverage: Option<TimeWindow> = None;
            for (a, b) in requests {
                let w = TimeWindow::new(base + TimeDelta::hours(a), base + TimeDelta::hours(b)).unwrap();
                ctl.clear_calls().await;

                let (points, provenance) = gm.fetch_series_with_provenance(key, w).await.unwrap();

                // Every requested hour is served exactly once.
                assert_eq!(points.len() as i64, b - a);
                // Nothing already covered is fetched again.
                for fetched in ctl.calls_for(key).await {
                    if let Some(cov) = coverage {
                        assert!(fetched.end <= cov.start || fetched.start >= cov.end);
                    }
                }
                let now_cov = provenance.coverage.unwrap();
                assert!(now_cov.covers(&w));
                if let Some(prev) = coverage {
                    assert!(now_cov.covers(&prev));
                }
                coverage = Some(now_cov);
            }
        });
    }
}
