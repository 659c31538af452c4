use std::collections::HashMap;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use folio::cache::FetchCache;
use folio::infra::telemetry::{
    FETCH_CACHE_HIT_TOTAL, FETCH_CACHE_INVALIDATE_TOTAL, FETCH_CACHE_MISS_TOTAL,
};

#[tokio::test]
async fn fetch_cache_emits_hit_miss_and_invalidate_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let cache: FetchCache<u32, String, String> = FetchCache::new("metrics_probe");
    cache
        .get(1, || async { Ok("one".to_string()) })
        .await
        .expect("first read");
    cache
        .get(1, || async { Ok("unused".to_string()) })
        .await
        .expect("second read");
    assert!(cache.invalidate(&1));
    assert!(!cache.invalidate(&1));

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| {
            key.key()
                .labels()
                .any(|label| label.key() == "cache" && label.value() == "metrics_probe")
        })
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((key.key().name().to_string(), count)),
            _ => None,
        })
        .collect();

    assert_eq!(counters.get(FETCH_CACHE_MISS_TOTAL), Some(&1));
    assert_eq!(counters.get(FETCH_CACHE_HIT_TOTAL), Some(&1));
    assert_eq!(counters.get(FETCH_CACHE_INVALIDATE_TOTAL), Some(&1));
}
