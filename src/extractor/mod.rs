//! Per-file endpoint extraction.
//!
//! A route file is turned into zero or more [`Endpoint`]s, one for every HTTP method it
//! exports a handler for. The pipeline for one file is:
//!
//! 1. [`crate::route_path`] turns the file location into a route path
//! 2. [`handler`] finds each exported handler and its documentation comment
//! 3. [`crate::describer`] picks a description for the endpoint
//! 4. [`params`] and [`payload`] mine parameters, request body and responses
//!
//! Parameter, body and response mining looks at the whole file rather than the body of
//! one handler, so signals found anywhere in the file are attributed to every method the
//! file exports.
//!
//! # Example
//!
//! ```
//! use api_doc_scanner::extractor::{EndpointExtractor, HttpMethod};
//! use api_doc_scanner::tables::DescriptionTables;
//! use std::path::Path;
//!
//! let tables = DescriptionTables::default();
//! let extractor = EndpointExtractor::new("/api", &tables);
//! let endpoints = extractor.extract(
//!     Path::new("posts/[id]/route.ts"),
//!     "export async function DELETE(req, { params }) {}",
//! );
//! assert_eq!(endpoints.len(), 1);
//! assert_eq!(endpoints[0].method, HttpMethod::Delete);
//! assert_eq!(endpoints[0].path, "/api/posts/{id}");
//! ```

pub mod handler;
pub mod params;
pub mod payload;

use crate::describer;
use crate::route_path;
use crate::tables::DescriptionTables;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// HTTP methods a route file can export handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// All methods, in the order they are reported for a file.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete documentation metadata for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub method: HttpMethod,
    /// URL route path, e.g. `/api/posts/{id}`
    pub path: String,
    /// Human readable summary; never empty
    pub description: String,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Always holds at least one entry
    pub responses: Vec<ResponseDescriptor>,
    pub tags: BTreeSet<String>,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A single endpoint parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where a parameter is read from.
///
/// `Header` is part of the model, but no extraction pass produces it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

/// Request body accepted by an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Media type, e.g. `application/json`
    #[serde(rename = "type")]
    pub media_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

/// One documented response of an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    pub status: u16,
    pub description: String,
    pub example: serde_json::Value,
}

/// Extracts endpoints from the text of route files.
pub struct EndpointExtractor<'a> {
    api_prefix: &'a str,
    tables: &'a DescriptionTables,
}

impl<'a> EndpointExtractor<'a> {
    pub fn new(api_prefix: &'a str, tables: &'a DescriptionTables) -> Self {
        Self { api_prefix, tables }
    }

    /// Extracts every endpoint defined in one route file.
    ///
    /// # Arguments
    ///
    /// * `relative` - The file's path beneath the scan root, e.g. `posts/[id]/route.ts`
    /// * `content` - The file's full source text
    ///
    /// # Returns
    ///
    /// One endpoint per exported handler, in [`HttpMethod::ALL`] order. A file that
    /// exports no handlers yields an empty vector.
    pub fn extract(&self, relative: &Path, content: &str) -> Vec<Endpoint> {
        let path = route_path::route_path(self.api_prefix, relative);

        // File-wide signals are shared by every handler in the file
        let mut parameters = params::path_parameters(&path);
        parameters.extend(params::query_parameters(content));
        let request_body = payload::request_body(content);
        let responses = payload::responses(content);

        let mut endpoints = Vec::new();
        for method in HttpMethod::ALL {
            let Some(found) = handler::find_handler(content, method) else {
                continue;
            };

            let description = describer::describe(
                method,
                &path,
                found.doc_comment.as_deref(),
                self.tables,
            );
            debug!("Found endpoint: {} {} - {}", method, path, description.text);

            endpoints.push(Endpoint {
                method,
                path: path.clone(),
                description: description.text,
                parameters: parameters.clone(),
                request_body: request_body.clone(),
                responses: responses.clone(),
                tags: description.tags,
                deprecated: description.deprecated,
                version: description.version,
            });
        }

        endpoints
    }
}
