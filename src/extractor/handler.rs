//! Locating exported handler functions and their documentation comments.

use super::HttpMethod;
use once_cell::sync::Lazy;
use regex::Regex;

/// One `export async function VERB(` pattern per method, in [`HttpMethod::ALL`] order
static HANDLER_PATTERNS: Lazy<[Regex; 5]> = Lazy::new(|| {
    HttpMethod::ALL.map(|method| {
        Regex::new(&format!(r"export\s+async\s+function\s+{}\s*\(", method.as_str())).unwrap()
    })
});

/// An exported handler function found in a route file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMatch {
    /// Byte offset of the `export` keyword
    pub offset: usize,
    /// Raw text of the `/** ... */` block directly above the function, if any
    pub doc_comment: Option<String>,
}

/// Looks for `export async function <METHOD>(` in `content`.
///
/// Returns `None` when the method is not implemented by this file. Only the first
/// declaration counts, so each method yields at most one endpoint per file.
pub fn find_handler(content: &str, method: HttpMethod) -> Option<HandlerMatch> {
    let found = HANDLER_PATTERNS[method as usize].find(content)?;

    Some(HandlerMatch {
        offset: found.start(),
        doc_comment: preceding_doc_comment(content, found.start()),
    })
}

/// Returns the block comment that ends right before `offset`.
///
/// Only whitespace may sit between the closing `*/` and the function. The returned text
/// includes the `/**` and `*/` delimiters.
pub fn preceding_doc_comment(content: &str, offset: usize) -> Option<String> {
    let before = content.get(..offset)?.trim_end();
    if !before.ends_with("*/") {
        return None;
    }

    let start = before.rfind("/**")?;
    let comment = &before[start..];
    if comment.len() < 5 {
        return None;
    }

    // Reject a `/**` that belongs to an earlier, already closed comment
    let body = &comment[3..comment.len() - 2];
    if body.contains("*/") {
        return None;
    }

    Some(comment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_HANDLERS: &str = r#"
import { NextResponse } from 'next/server';

/**
 * 获取文章列表
 * @tag posts
 */
export async function GET(request: Request) {
  return NextResponse.json({ data: [] });
}

export async function POST(request: Request) {
  const body = await request.json();
  return NextResponse.json(body, { status: 201 });
}
"#;

    #[test]
    fn test_find_handler_present_and_absent() {
        assert!(find_handler(TWO_HANDLERS, HttpMethod::Get).is_some());
        assert!(find_handler(TWO_HANDLERS, HttpMethod::Post).is_some());
        assert!(find_handler(TWO_HANDLERS, HttpMethod::Delete).is_none());
        assert!(find_handler(TWO_HANDLERS, HttpMethod::Put).is_none());
    }

    #[test]
    fn test_each_method_matches_only_its_own_handler() {
        for method in HttpMethod::ALL {
            let content = format!("export async function {}(req) {{}}", method.as_str());
            for other in HttpMethod::ALL {
                assert_eq!(
                    find_handler(&content, other).is_some(),
                    other == method,
                    "{} handler seen as {}",
                    method,
                    other
                );
            }
        }
    }

    #[test]
    fn test_find_handler_requires_async_export() {
        let content = "export function GET() {}\nasync function POST() {}";
        assert!(find_handler(content, HttpMethod::Get).is_none());
        assert!(find_handler(content, HttpMethod::Post).is_none());
    }

    #[test]
    fn test_find_handler_does_not_match_prefixed_names() {
        let content = "export async function GETALL(req) {}";
        assert!(find_handler(content, HttpMethod::Get).is_none());
    }

    #[test]
    fn test_doc_comment_attached_to_handler() {
        let get = find_handler(TWO_HANDLERS, HttpMethod::Get).unwrap();
        let comment = get.doc_comment.expect("GET should carry its comment");
        assert!(comment.starts_with("/**"));
        assert!(comment.contains("获取文章列表"));
        assert!(comment.ends_with("*/"));
    }

    #[test]
    fn test_doc_comment_not_borrowed_from_other_handler() {
        let post = find_handler(TWO_HANDLERS, HttpMethod::Post).unwrap();
        assert_eq!(post.doc_comment, None);
    }

    #[test]
    fn test_doc_comment_separated_by_code_is_ignored() {
        let content = "/** 旧注释 */\nconst x = 1;\nexport async function GET() {}";
        let get = find_handler(content, HttpMethod::Get).unwrap();
        assert_eq!(get.doc_comment, None);
    }

    #[test]
    fn test_plain_block_comment_is_not_doc_comment() {
        let content = "/** first */ const a = 1; /* plain */\nexport async function GET() {}";
        let get = find_handler(content, HttpMethod::Get).unwrap();
        assert_eq!(get.doc_comment, None);
    }
}
