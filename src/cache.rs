//! Time-limited cache in front of the endpoint index.
//!
//! [`ScanCache`] keeps the most recent [`ScanResult`] and hands out the same
//! `Arc<ScanResult>` until the entry is older than the TTL or a caller forces a refresh.
//! The check-then-scan sequence runs under one lock, and callers that were waiting while
//! another caller's scan completed reuse that result instead of scanning again.

use crate::clock::Clock;
use crate::error::Result;
use crate::scanner::ScanResult;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Anything that can produce a fresh scan result.
pub trait EndpointSource: Send + Sync {
    fn scan(&self) -> Result<ScanResult>;
}

/// A stored scan result and the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub data: Arc<ScanResult>,
}

/// Single-entry scan cache with a time-to-live.
pub struct ScanCache<S> {
    source: S,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
    /// Bumped every time a new entry is stored
    generation: AtomicU64,
}

impl<S: EndpointSource> ScanCache<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            entry: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the cached result, scanning first if needed.
    ///
    /// A scan runs when there is no entry, when the entry has outlived the TTL, or when
    /// `force_refresh` is set. A caller that had to wait for another caller's scan gets
    /// that scan's result, even when it asked for a forced refresh.
    ///
    /// # Errors
    ///
    /// Propagates the source's error. The existing entry, if any, is left untouched.
    pub fn get(&self, force_refresh: bool) -> Result<Arc<ScanResult>> {
        let observed = self.generation.load(Ordering::SeqCst);
        let mut entry = self.lock();

        if let Some(cached) = entry.as_ref() {
            if self.generation.load(Ordering::SeqCst) != observed {
                debug!("Reusing scan completed while waiting");
                return Ok(Arc::clone(&cached.data));
            }
            if !force_refresh && self.is_fresh(cached) {
                debug!("Serving cached scan from {}", cached.timestamp);
                return Ok(Arc::clone(&cached.data));
            }
        }

        if force_refresh {
            info!("Forced refresh, rescanning");
        }

        let data = Arc::new(self.source.scan()?);
        *entry = Some(CacheEntry {
            timestamp: self.clock.now(),
            data: Arc::clone(&data),
        });
        self.generation.fetch_add(1, Ordering::SeqCst);

        Ok(data)
    }

    /// Time the current entry was stored, if there is one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.lock().as_ref().map(|entry| entry.timestamp)
    }

    /// Drops the current entry so the next [`get`](Self::get) scans.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        // A timestamp in the future (clock moved backwards) counts as stale
        match (self.clock.now() - entry.timestamp).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::Error;
    use crate::scanner::ScanStats;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::thread;

    /// Counts scans and returns an empty result stamped with the clock.
    struct CountingSource {
        clock: Arc<ManualClock>,
        scans: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl CountingSource {
        fn new(clock: Arc<ManualClock>) -> Self {
            Self {
                clock,
                scans: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: false,
            }
        }

        fn scans(&self) -> usize {
            self.scans.load(Ordering::SeqCst)
        }
    }

    impl EndpointSource for CountingSource {
        fn scan(&self) -> Result<ScanResult> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            if self.fail {
                return Err(Error::RootNotFound(PathBuf::from("/missing")));
            }
            Ok(ScanResult {
                groups: Vec::new(),
                stats: ScanStats {
                    total_groups: 0,
                    total_endpoints: 0,
                    last_scan_timestamp: self.clock.now(),
                },
            })
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ))
    }

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_hit_within_ttl() {
        let clock = clock();
        let cache = ScanCache::new(CountingSource::new(clock.clone()), clock.clone(), TTL);

        let first = cache.get(false).unwrap();
        clock.advance(chrono::Duration::seconds(299));
        let second = cache.get(false).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().scans(), 1);
    }

    #[test]
    fn test_expired_entry_rescans() {
        let clock = clock();
        let cache = ScanCache::new(CountingSource::new(clock.clone()), clock.clone(), TTL);

        let first = cache.get(false).unwrap();
        clock.advance(chrono::Duration::seconds(300));
        let second = cache.get(false).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().scans(), 2);
        assert_eq!(cache.timestamp(), Some(clock.now()));
    }

    #[test]
    fn test_force_refresh_always_rescans() {
        let clock = clock();
        let cache = ScanCache::new(CountingSource::new(clock.clone()), clock.clone(), TTL);

        cache.get(false).unwrap();
        clock.advance(chrono::Duration::seconds(10));
        cache.get(true).unwrap();
        clock.advance(chrono::Duration::seconds(10));
        cache.get(true).unwrap();

        assert_eq!(cache.source().scans(), 3);
        assert_eq!(cache.timestamp(), Some(clock.now()));
    }

    #[test]
    fn test_clock_moving_backwards_counts_as_stale() {
        let clock = clock();
        let cache = ScanCache::new(CountingSource::new(clock.clone()), clock.clone(), TTL);

        cache.get(false).unwrap();
        clock.advance(chrono::Duration::seconds(-60));
        cache.get(false).unwrap();

        assert_eq!(cache.source().scans(), 2);
    }

    #[test]
    fn test_failed_scan_writes_nothing() {
        let clock = clock();
        let mut source = CountingSource::new(clock.clone());
        source.fail = true;
        let cache = ScanCache::new(source, clock.clone(), TTL);

        assert!(cache.get(false).is_err());
        assert_eq!(cache.timestamp(), None);
    }

    #[test]
    fn test_invalidate() {
        let clock = clock();
        let cache = ScanCache::new(CountingSource::new(clock.clone()), clock.clone(), TTL);

        cache.get(false).unwrap();
        cache.invalidate();
        assert_eq!(cache.timestamp(), None);
        cache.get(false).unwrap();

        assert_eq!(cache.source().scans(), 2);
    }

    #[test]
    fn test_concurrent_cold_reads_scan_once() {
        let clock = clock();
        let mut source = CountingSource::new(clock.clone());
        source.delay = Duration::from_millis(50);
        let cache = Arc::new(ScanCache::new(source, clock.clone(), TTL));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get(false).unwrap()
                })
            })
            .collect();
        let results: Vec<Arc<ScanResult>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(cache.source().scans(), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[test]
    fn test_concurrent_forced_refreshes_coalesce() {
        let clock = clock();
        let mut source = CountingSource::new(clock.clone());
        source.delay = Duration::from_millis(200);
        let cache = Arc::new(ScanCache::new(source, clock.clone(), TTL));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get(true).unwrap()
                })
            })
            .collect();
        let results: Vec<Arc<ScanResult>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(cache.source().scans(), 1);
        assert!(Arc::ptr_eq(&results[0], &results[1]));
    }
}
