use crate::cache::EndpointSource;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::extractor::{Endpoint, EndpointExtractor};
use crate::route_path::{self, DEFAULT_API_PREFIX};
use crate::tables::DescriptionTables;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use walkdir::WalkDir;

/// Default lifetime of a cached scan result.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Settings for scanning one route root.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Directory holding the route handler tree
    pub root: PathBuf,
    /// URL prefix the root is mounted under
    pub api_prefix: String,
    /// How long a scan result stays fresh in the cache
    pub ttl: Duration,
    /// Lookup tables for descriptions
    pub tables: DescriptionTables,
}

impl ScannerConfig {
    /// Creates a configuration for `root` with the default prefix, TTL and tables.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            ttl: DEFAULT_TTL,
            tables: DescriptionTables::default(),
        }
    }
}

/// All endpoints found under one top-level directory of the scan root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Name of the top-level directory
    pub name: String,
    pub description: String,
    pub endpoints: Vec<Endpoint>,
    pub last_updated: DateTime<Utc>,
}

/// Aggregate counts for a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub total_groups: usize,
    pub total_endpoints: usize,
    pub last_scan_timestamp: DateTime<Utc>,
}

/// The complete documentation index produced by one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub groups: Vec<Group>,
    pub stats: ScanStats,
}

/// Walks a route root and builds the endpoint index.
///
/// Every first-level directory below the root becomes a [`Group`]. Inside a group all
/// nested directories are visited and every recognized endpoint file (see
/// [`route_path::is_endpoint_file`]) is run through the [`EndpointExtractor`]. Hidden
/// directories and `node_modules` are skipped.
///
/// # Example
///
/// ```no_run
/// use api_doc_scanner::clock::SystemClock;
/// use api_doc_scanner::scanner::{EndpointIndexer, ScannerConfig};
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// let config = ScannerConfig::new(PathBuf::from("./app/api"));
/// let indexer = EndpointIndexer::new(config, Arc::new(SystemClock));
/// let result = indexer.index().unwrap();
/// println!("Found {} endpoints", result.stats.total_endpoints);
/// ```
pub struct EndpointIndexer {
    config: ScannerConfig,
    clock: Arc<dyn Clock>,
}

impl EndpointIndexer {
    pub fn new(config: ScannerConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scans every group under the root.
    ///
    /// A group whose directory tree cannot be listed is logged and left out; a file that
    /// cannot be read contributes no endpoints. Groups without endpoints are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootNotFound`] if the root is missing or cannot be listed.
    pub fn index(&self) -> Result<ScanResult> {
        let root = &self.config.root;
        info!("Scanning API routes under {}", root.display());

        let entries = fs::read_dir(root).map_err(|e| {
            warn!("Failed to read scan root {}: {}", root.display(), e);
            Error::RootNotFound(root.clone())
        })?;

        let mut group_dirs: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if path.is_dir() && !is_skipped_dir(&name) {
                        group_dirs.push((name, path));
                    }
                }
                Err(e) => warn!("Failed to read entry in {}: {}", root.display(), e),
            }
        }
        group_dirs.sort();

        let mut groups = Vec::new();
        for (name, dir) in &group_dirs {
            match self.scan_group(name, dir) {
                Ok(Some(group)) => groups.push(group),
                Ok(None) => debug!("Group {} has no endpoints, dropping it", name),
                Err(e) => warn!("Skipping group {}: {}", name, e),
            }
        }

        let total_endpoints = groups.iter().map(|g| g.endpoints.len()).sum();
        let stats = ScanStats {
            total_groups: groups.len(),
            total_endpoints,
            last_scan_timestamp: self.clock.now(),
        };

        info!(
            "Scan complete: {} groups, {} endpoints",
            stats.total_groups, stats.total_endpoints
        );

        Ok(ScanResult { groups, stats })
    }

    /// Scans one top-level directory.
    ///
    /// Returns `Ok(None)` if the directory holds no endpoints.
    pub fn scan_group(&self, name: &str, dir: &Path) -> Result<Option<Group>> {
        debug!("Scanning group {} at {}", name, dir.display());

        let files = self.collect_endpoint_files(dir)?;
        let extractor = EndpointExtractor::new(&self.config.api_prefix, &self.config.tables);

        let per_file: Vec<Vec<Endpoint>> = files
            .par_iter()
            .map(|path| self.extract_file(&extractor, path))
            .collect();
        let endpoints: Vec<Endpoint> = per_file.into_iter().flatten().collect();

        if endpoints.is_empty() {
            return Ok(None);
        }

        Ok(Some(Group {
            name: name.to_string(),
            description: self.group_description(name),
            endpoints,
            last_updated: self.clock.now(),
        }))
    }

    /// Lists the endpoint files below `dir`, each directory's files ahead of its
    /// subdirectories.
    fn collect_endpoint_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        // Files before subdirectories, then by name; symlinks are followed and a link
        // cycle fails the walk
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the group directory itself
                if e.depth() == 0 {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                !(e.file_type().is_dir() && is_skipped_dir(&file_name))
            })
        {
            let entry = entry.map_err(std::io::Error::from)?;
            let is_endpoint = entry.file_type().is_file()
                && route_path::is_endpoint_file(&entry.file_name().to_string_lossy());
            if is_endpoint {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} endpoint files in {}", files.len(), dir.display());
        Ok(files)
    }

    fn extract_file(&self, extractor: &EndpointExtractor<'_>, path: &Path) -> Vec<Endpoint> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let relative = path.strip_prefix(&self.config.root).unwrap_or(path);
        extractor.extract(relative, &content)
    }

    fn group_description(&self, name: &str) -> String {
        let tables = &self.config.tables;
        match tables.group_description(name) {
            Some(description) => description.to_string(),
            None => {
                let noun = tables.resource_noun(name).unwrap_or(name);
                format!("{}相关接口", noun)
            }
        }
    }
}

impl EndpointSource for EndpointIndexer {
    fn scan(&self) -> Result<ScanResult> {
        self.index()
    }
}

fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name == "node_modules"
}
