//! Time-bounded memo of price fetches keyed by `(symbol, period)`.
//!
//! Wraps any [`DataPort`]. Only successful, non-empty fetches are stored so
//! an unknown symbol or a transient failure is retried on the next request.

use crate::domain::error::TickerdashError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use cached::{Cached, TimedCache};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type CacheKey = (String, Period);

pub struct CachedDataPort {
    inner: Box<dyn DataPort + Send + Sync>,
    cache: Mutex<TimedCache<CacheKey, Vec<OhlcvBar>>>,
}

impl CachedDataPort {
    pub fn new(inner: Box<dyn DataPort + Send + Sync>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(TimedCache::with_lifespan(ttl)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimedCache<CacheKey, Vec<OhlcvBar>>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drops the entry for one `(symbol, period)` pair.
    pub fn invalidate(&self, symbol: &str, period: Period) -> bool {
        self.lock()
            .cache_remove(&(symbol.to_string(), period))
            .is_some()
    }

    pub fn clear(&self) {
        let mut cache = self.lock();
        let evicted = cache.cache_size();
        cache.cache_clear();
        tracing::info!(evicted, "price cache cleared");
    }

    pub fn len(&self) -> usize {
        self.lock().cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DataPort for CachedDataPort {
    fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<OhlcvBar>, TickerdashError> {
        let key = (symbol.to_string(), period);
        if let Some(bars) = self.lock().cache_get(&key) {
            tracing::debug!(%symbol, %period, "price cache hit");
            return Ok(bars.clone());
        }

        tracing::debug!(%symbol, %period, "price cache miss");
        // Lock is not held across the fetch; concurrent misses may both fetch.
        let bars = self.inner.fetch_history(symbol, period)?;
        if !bars.is_empty() {
            self.lock().cache_set(key, bars.clone());
        }
        Ok(bars)
    }
}
