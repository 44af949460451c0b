use crate::helpers::{dt, harness, hours};
use gridmix::{CacheStore, FileStore, SeriesKey, TimeWindow};

#[tokio::test]
async fn second_identical_request_is_served_from_cache() {
    let h = harness();
    let key = SeriesKey::GENERATION_PT;

    let first = h.gm.fetch_series(key, hours(0, 6)).await.unwrap();
    let second = h.gm.fetch_series(key, hours(0, 6)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
    assert_eq!(h.fetched(key).await, vec![hours(0, 6)]);
}

#[tokio::test]
async fn sub_window_of_coverage_issues_no_remote_call() {
    let h = harness();
    let key = SeriesKey::FLOW_ES_TO_PT;
    h.gm.fetch_series(key, hours(0, 8)).await.unwrap();
    h.ctl.clear_calls().await;

    let (points, provenance) = h
        .gm
        .fetch_series_with_provenance(key, hours(2, 5))
        .await
        .unwrap();

    assert_eq!(points.len(), 3);
    assert!(provenance.served_from_cache());
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn partial_hit_fetches_exactly_the_uncovered_tail() {
    let h = harness();
    let key = SeriesKey::GENERATION_ES;
    h.gm.fetch_series(key, hours(0, 4)).await.unwrap();
    h.ctl.clear_calls().await;

    let table = h.gm.fetch_series(key, hours(2, 9)).await.unwrap();

    assert_eq!(h.fetched(key).await, vec![hours(4, 9)]);
    assert_eq!(table.index.first(), Some(&dt(2024, 6, 10, 2)));
    assert_eq!(table.len(), 7);
}

#[tokio::test]
async fn request_past_the_frontier_fetches_from_the_coverage_end() {
    let h = harness();
    let key = SeriesKey::FLOW_PT_TO_ES;
    h.gm.fetch_series(key, hours(0, 2)).await.unwrap();
    h.ctl.clear_calls().await;

    let (_, provenance) = h
        .gm
        .fetch_series_with_provenance(key, hours(5, 7))
        .await
        .unwrap();

    assert_eq!(provenance.fetched, vec![hours(2, 7)]);
    assert_eq!(provenance.coverage, Some(hours(0, 7)));
}

#[tokio::test]
async fn request_before_coverage_fetches_the_backward_gap() {
    let h = harness();
    let key = SeriesKey::GENERATION_FR;
    h.gm.fetch_series(key, hours(6, 10)).await.unwrap();
    h.ctl.clear_calls().await;

    let table = h.gm.fetch_series(key, hours(2, 8)).await.unwrap();

    assert_eq!(h.fetched(key).await, vec![hours(2, 6)]);
    assert_eq!(table.len(), 6);
    assert_eq!(h.gm.cached_coverage(key).await.unwrap(), Some(hours(2, 10)));
}

#[tokio::test]
async fn coverage_end_never_decreases() {
    let h = harness();
    let key = SeriesKey::FLOW_FR_TO_ES;
    let requests = [hours(0, 3), hours(5, 8), hours(1, 2), hours(0, 4), hours(7, 11)];

    let mut last_end = None;
    for w in requests {
        h.gm.fetch_series(key, w).await.unwrap();
        let cov: TimeWindow = h.gm.cached_coverage(key).await.unwrap().unwrap();
        if let Some(prev) = last_end {
            assert!(cov.end >= prev, "coverage shrank from {prev} to {}", cov.end);
        }
        last_end = Some(cov.end);
    }
    assert_eq!(last_end, Some(dt(2024, 6, 10, 11)));
}

#[tokio::test]
async fn cache_files_survive_a_new_orchestrator() {
    let h = harness();
    let key = SeriesKey::GENERATION_PT;
    h.gm.fetch_series(key, hours(0, 3)).await.unwrap();

    let store = FileStore::new(h.dir.path());
    let cached = store.load(key).await.unwrap().unwrap();
    assert_eq!(cached.coverage(), hours(0, 3));
    assert!(store.data_path(key).exists());
    assert!(store.metadata_path(key).exists());
}

#[tokio::test]
async fn empty_response_leaves_cache_untouched() {
    let h = harness();
    let key = SeriesKey::FLOW_ES_TO_FR;
    h.ctl
        .set_behavior(key, gridmix_mock::MockBehavior::Return(Vec::new()))
        .await;

    let table = h.gm.fetch_series(key, hours(0, 4)).await.unwrap();

    assert!(table.is_empty());
    assert_eq!(h.gm.cached_coverage(key).await.unwrap(), None);
}
