//! API documentation scanner - endpoint documentation from file-based route handlers.
//!
//! This library walks a directory of route handler files (the `app/api/**/route.ts`
//! convention), pattern-matches each file's source text, and builds a grouped index of
//! HTTP endpoints with descriptions, parameters, request bodies and responses. Nothing is
//! executed or type-checked; extraction is best effort.
//!
//! # Architecture
//!
//! 1. [`route_path`] - Maps file locations to URL routes and recognizes endpoint files
//! 2. [`extractor`] - Finds exported handlers and mines parameters, bodies and responses
//! 3. [`describer`] - Chooses or generates a description for each endpoint
//! 4. [`tables`] - Static lookup tables backing the describer
//! 5. [`scanner`] - Walks the root and groups endpoints by top-level directory
//! 6. [`cache`] - Keeps the last scan result for a TTL
//! 7. [`docs`] - The `scan(force_refresh)` entry point used by the documentation UI
//! 8. [`serializer`] - Serializes the result to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use api_doc_scanner::{docs::ApiDocs, scanner::ScannerConfig, serializer::serialize_json};
//! use std::path::PathBuf;
//!
//! let docs = ApiDocs::new(ScannerConfig::new(PathBuf::from("./app/api")));
//!
//! // Served from cache for five minutes
//! let result = docs.scan(false).unwrap();
//! println!("{}", serialize_json(&result).unwrap());
//!
//! // Ignore the cache
//! let refreshed = docs.scan(true).unwrap();
//! println!("{} endpoints", refreshed.stats.total_endpoints);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cache;
pub mod cli;
pub mod clock;
pub mod describer;
pub mod docs;
pub mod error;
pub mod extractor;
pub mod route_path;
pub mod scanner;
pub mod serializer;
pub mod tables;
