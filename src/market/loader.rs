use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::GameError;
use crate::model::price::Series;

use super::cache::SeriesCache;

pub type SharedCache = Arc<Mutex<SeriesCache>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOrigin {
    Cache,
    Network,
}

#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: Series,
    pub origin: SeriesOrigin,
}

fn cached(cache: &SharedCache, ticker: &str, now_ms: i64) -> Option<Series> {
    let guard = match cache.lock() {
        Ok(guard) => guard,
        Err(e) => {
            tracing::warn!(error = %e, "series cache lock poisoned");
            return None;
        }
    };
    match guard.get(ticker, now_ms) {
        Ok(hit) => hit,
        Err(e) => {
            tracing::warn!(ticker = %ticker, error = %e, "series cache read failed");
            None
        }
    }
}

fn store(cache: &SharedCache, ticker: &str, series: &Series, now_ms: i64) {
    let result = match cache.lock() {
        Ok(guard) => guard.put(ticker, series, now_ms),
        Err(e) => {
            tracing::warn!(error = %e, "series cache lock poisoned");
            return;
        }
    };
    match result {
        Ok(()) => tracing::debug!(ticker = %ticker, points = series.len(), "series cached"),
        Err(e) => tracing::warn!(ticker = %ticker, error = %e, "series cache write failed"),
    }
}

/// Serve `ticker` from a fresh cache entry, otherwise from `fetch`.
///
/// Cache failures only degrade to a network fetch; they never fail the load.
pub async fn load_series<F, Fut>(
    ticker: &str,
    cache: Option<&SharedCache>,
    now_ms: i64,
    fetch: F,
) -> Result<LoadedSeries, GameError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Series, GameError>>,
{
    if let Some(series) = cache.and_then(|c| cached(c, ticker, now_ms)) {
        tracing::info!(ticker = %ticker, points = series.len(), "series served from cache");
        return Ok(LoadedSeries {
            series,
            origin: SeriesOrigin::Cache,
        });
    }

    tracing::info!(ticker = %ticker, "fetching daily series");
    let series = fetch(ticker.to_string()).await?;
    tracing::info!(ticker = %ticker, points = series.len(), "fetched daily series");

    if let Some(c) = cache {
        store(c, ticker, &series, now_ms);
    }
    Ok(LoadedSeries {
        series,
        origin: SeriesOrigin::Network,
    })
}
