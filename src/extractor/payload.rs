//! Request body and response mining.

use super::{RequestBody, ResponseDescriptor};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

static JSON_BODY_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:request|req)\.json\(\s*\)").unwrap());

static STATUS_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bstatus\s*:\s*(\d{3})\b").unwrap());

/// Returns a JSON request body if the file parses one anywhere.
pub fn request_body(content: &str) -> Option<RequestBody> {
    if !JSON_BODY_CALL.is_match(content) {
        return None;
    }

    Some(RequestBody {
        media_type: "application/json".to_string(),
        required: true,
        description: Some("JSON 格式的请求数据".to_string()),
        example: None,
    })
}

/// Lists one response per `status: NNN` literal in the file, duplicates included.
///
/// A file without any status literal gets a single generic 200 response.
pub fn responses(content: &str) -> Vec<ResponseDescriptor> {
    let mut responses: Vec<ResponseDescriptor> = STATUS_LITERAL
        .captures_iter(content)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<u16>().ok())
        .map(describe_status)
        .collect();

    if responses.is_empty() {
        responses.push(ResponseDescriptor {
            status: 200,
            description: "成功".to_string(),
            example: json!({ "success": true, "data": {} }),
        });
    }

    responses
}

/// Canned description and example payload for a status code.
pub fn describe_status(status: u16) -> ResponseDescriptor {
    let (description, example): (&str, Value) = match status {
        200 => ("成功", json!({ "success": true, "data": {} })),
        201 => ("创建成功", json!({ "success": true, "data": { "id": 1 } })),
        400 => ("请求参数错误", json!({ "error": "Bad Request" })),
        401 => ("未授权", json!({ "error": "Unauthorized" })),
        403 => ("禁止访问", json!({ "error": "Forbidden" })),
        404 => ("资源不存在", json!({ "error": "Not Found" })),
        500 => ("服务器内部错误", json!({ "error": "Internal Server Error" })),
        _ => ("响应", json!({ "success": true })),
    };

    ResponseDescriptor {
        status,
        description: description.to_string(),
        example,
    }
}
