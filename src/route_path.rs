//! Translation between the file-system route convention and URL route paths.
//!
//! Route handlers live in files such as `posts/[id]/route.ts`. The directory part of the
//! path becomes the URL (`/api/posts/{id}`), with bracketed dynamic segments rewritten to
//! the brace syntax used on the wire.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path};

/// Default URL prefix every scanned route is mounted under.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// File stems that mark a file as an endpoint definition.
const ENDPOINT_FILE_STEMS: &[&str] = &["route", "index", "api"];

/// Source extensions accepted for endpoint definition files.
const ENDPOINT_FILE_EXTENSIONS: &[&str] = &["ts", "js", "tsx", "jsx"];

static DYNAMIC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}/]+)\}").unwrap());

/// Returns true iff `file_name` is one of the recognized endpoint definition files.
///
/// Only the bare file name is inspected; `route.ts` qualifies, `utils.ts` and
/// `route.test.ts` do not.
pub fn is_endpoint_file(file_name: &str) -> bool {
    let Some((stem, extension)) = file_name.rsplit_once('.') else {
        return false;
    };

    ENDPOINT_FILE_STEMS.contains(&stem) && ENDPOINT_FILE_EXTENSIONS.contains(&extension)
}

/// Rewrites a single file-system segment into its URL form.
///
/// `[id]` becomes `{id}`. Catch-alls `[...path]` and optional catch-alls `[[...path]]`
/// both become `{...path}`. Static segments are returned unchanged.
pub fn translate_segment(segment: &str) -> String {
    match strip_brackets(segment).map(|inner| strip_brackets(inner).unwrap_or(inner)) {
        Some(inner) if !inner.is_empty() => format!("{{{}}}", inner),
        _ => segment.to_string(),
    }
}

fn strip_brackets(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
}

/// Builds the URL route path for an endpoint file.
///
/// `relative` is the file's location beneath the scan root. The trailing file name is
/// dropped, every remaining segment is translated with [`translate_segment`] and the
/// result is joined under `prefix`.
///
/// # Example
///
/// ```
/// use api_doc_scanner::route_path::route_path;
/// use std::path::Path;
///
/// let path = route_path("/api", Path::new("posts/[id]/route.ts"));
/// assert_eq!(path, "/api/posts/{id}");
/// ```
pub fn route_path(prefix: &str, relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    // The last component is the handler file itself
    segments.pop();

    let prefix = prefix.trim_end_matches('/');
    let mut path = String::from(prefix);
    for segment in &segments {
        path.push('/');
        path.push_str(&translate_segment(segment));
    }

    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Returns true if a URL path segment is a dynamic `{name}` segment.
pub fn is_dynamic_segment(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Lists the dynamic parameter names of a route path in order of appearance.
///
/// Catch-all names keep their ellipsis: `/api/files/{...path}` yields `...path`.
pub fn path_parameters(path: &str) -> Vec<String> {
    DYNAMIC_TOKEN
        .captures_iter(path)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
