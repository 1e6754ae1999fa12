//! Parameter mining: path parameters from the route, query parameters from the source.

use super::{Parameter, ParameterLocation};
use crate::route_path;
use once_cell::sync::Lazy;
use regex::Regex;

/// `searchParams.get('name')` or `searchParams.get("name")`
static QUERY_ACCESSOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"searchParams\.get\(\s*(?:'([^']+)'|"([^"]+)")\s*\)"#).unwrap()
});

const DEFAULT_PARAM_TYPE: &str = "string";

/// One required path parameter per dynamic segment of `path`.
pub fn path_parameters(path: &str) -> Vec<Parameter> {
    route_path::path_parameters(path)
        .into_iter()
        .map(|name| Parameter {
            description: Some(format!("路径参数: {}", name)),
            name,
            param_type: DEFAULT_PARAM_TYPE.to_string(),
            location: ParameterLocation::Path,
            required: true,
        })
        .collect()
}

/// One optional query parameter per distinct name read through `searchParams.get`.
///
/// Names keep the order of their first read.
pub fn query_parameters(content: &str) -> Vec<Parameter> {
    let mut parameters: Vec<Parameter> = Vec::new();

    for cap in QUERY_ACCESSOR.captures_iter(content) {
        let Some(name) = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str()) else {
            continue;
        };
        if parameters.iter().any(|p| p.name == name) {
            continue;
        }

        parameters.push(Parameter {
            name: name.to_string(),
            param_type: DEFAULT_PARAM_TYPE.to_string(),
            location: ParameterLocation::Query,
            required: false,
            description: Some(format!("查询参数: {}", name)),
        });
    }

    parameters
}
