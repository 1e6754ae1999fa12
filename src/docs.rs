//! The query surface consumed by the documentation UI.

use crate::cache::ScanCache;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::scanner::{EndpointIndexer, ScanResult, ScannerConfig};
use std::sync::Arc;

/// Cached API documentation for one route root.
///
/// # Example
///
/// ```no_run
/// use api_doc_scanner::docs::ApiDocs;
/// use api_doc_scanner::scanner::ScannerConfig;
/// use std::path::PathBuf;
///
/// let docs = ApiDocs::new(ScannerConfig::new(PathBuf::from("./app/api")));
/// let result = docs.scan(false).unwrap();
/// for group in &result.groups {
///     println!("{}: {} endpoints", group.name, group.endpoints.len());
/// }
/// ```
pub struct ApiDocs {
    cache: ScanCache<EndpointIndexer>,
}

impl ApiDocs {
    /// Creates the documentation index using the system clock.
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates the documentation index with an explicit clock.
    pub fn with_clock(config: ScannerConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = config.ttl;
        let indexer = EndpointIndexer::new(config, Arc::clone(&clock));
        Self {
            cache: ScanCache::new(indexer, clock, ttl),
        }
    }

    /// Returns the endpoint index, rescanning when stale or when `force_refresh` is set.
    ///
    /// # Errors
    ///
    /// Fails only when the scan root is missing or unreadable; nothing is cached then.
    pub fn scan(&self, force_refresh: bool) -> Result<Arc<ScanResult>> {
        self.cache.get(force_refresh)
    }

    pub fn config(&self) -> &ScannerConfig {
        self.cache.source().config()
    }

    pub fn cache(&self) -> &ScanCache<EndpointIndexer> {
        &self.cache
    }
}
