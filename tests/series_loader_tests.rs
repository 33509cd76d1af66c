use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use ticker_guess::error::GameError;
use ticker_guess::market::cache::{SeriesCache, DEFAULT_TTL_MS};
use ticker_guess::market::loader::{load_series, SeriesOrigin, SharedCache};
use ticker_guess::model::price::{PricePoint, Series};

const NOW_MS: i64 = 1_700_000_000_000;

fn sample_series() -> Series {
    Series::new(vec![PricePoint::new(
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        42.0,
    )])
}

fn shared_cache() -> SharedCache {
    Arc::new(Mutex::new(
        SeriesCache::open_in_memory(DEFAULT_TTL_MS).expect("cache should open"),
    ))
}

#[test]
/// Verifies a fresh cache entry is served without touching the network.
fn cache_hit_skips_fetch() {
    let cache = shared_cache();
    cache
        .lock()
        .unwrap()
        .put("IBM", &sample_series(), NOW_MS - 1_000)
        .unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let loaded = tokio_test::block_on(load_series("IBM", Some(&cache), NOW_MS, |_| async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Series::default())
    }))
    .expect("load should succeed");

    assert_eq!(loaded.origin, SeriesOrigin::Cache);
    assert_eq!(loaded.series, sample_series());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
/// Verifies a miss fetches from the network and stores the result.
fn cache_miss_fetches_and_stores() {
    let cache = shared_cache();
    let loaded = tokio_test::block_on(load_series("IBM", Some(&cache), NOW_MS, |ticker| async move {
        assert_eq!(ticker, "IBM");
        Ok(sample_series())
    }))
    .expect("load should succeed");

    assert_eq!(loaded.origin, SeriesOrigin::Network);
    let stored = cache.lock().unwrap().get("IBM", NOW_MS + 1).unwrap();
    assert_eq!(stored, Some(sample_series()));
}

#[test]
/// Verifies fetch failures propagate unchanged and nothing is cached.
fn fetch_error_propagates_without_caching() {
    let cache = shared_cache();
    let err = tokio_test::block_on(load_series("ZZZZ", Some(&cache), NOW_MS, |_| async {
        Err(GameError::InvalidTicker)
    }))
    .unwrap_err();

    assert_eq!(err, GameError::InvalidTicker);
    assert_eq!(cache.lock().unwrap().get("ZZZZ", NOW_MS).unwrap(), None);
}

#[test]
/// Verifies the loader works with caching disabled.
fn no_cache_always_fetches() {
    let loaded = tokio_test::block_on(load_series("IBM", None, NOW_MS, |_| async {
        Ok(sample_series())
    }))
    .unwrap();
    assert_eq!(loaded.origin, SeriesOrigin::Network);
}
