//! Endpoint descriptions.
//!
//! A description comes from the first source that has one:
//!
//! 1. the known-endpoint table in [`DescriptionTables`]
//! 2. the handler's `/** ... */` documentation comment
//! 3. a generated phrase built from the HTTP method and the route's resource segment
//!
//! The documentation comment is only read when the known-endpoint table misses, so its
//! `@tag`, `@deprecated` and `@version` annotations are ignored for known endpoints.

use crate::extractor::HttpMethod;
use crate::route_path::is_dynamic_segment;
use crate::tables::DescriptionTables;
use std::collections::BTreeSet;

/// Noun used when a route has no usable resource segment.
const FALLBACK_RESOURCE: &str = "资源";

/// A description together with the annotations read from a documentation comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub tags: BTreeSet<String>,
    pub deprecated: bool,
    pub version: Option<String>,
}

impl Description {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Describes one endpoint. The returned text is never empty.
pub fn describe(
    method: HttpMethod,
    path: &str,
    doc_comment: Option<&str>,
    tables: &DescriptionTables,
) -> Description {
    if let Some(known) = tables.known_description(method, path) {
        return Description::plain(known);
    }

    if let Some(comment) = doc_comment {
        let mut parsed = parse_doc_comment(comment);
        if parsed.text.is_empty() {
            parsed.text = synthesize(method, path, tables);
        }
        return parsed;
    }

    Description::plain(synthesize(method, path, tables))
}

/// Parses a `/** ... */` block.
///
/// Free-text lines become the description, the last one winning. `@tag <value>` adds a
/// tag, `@deprecated` marks the endpoint deprecated and `@version <value>` sets the
/// version. Other `@` annotations are skipped.
pub fn parse_doc_comment(comment: &str) -> Description {
    let inner = comment.trim();
    let inner = inner.strip_prefix("/**").unwrap_or(inner);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    let mut description = Description::default();

    for line in inner.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if line.is_empty() {
            continue;
        }

        let Some(annotation) = line.strip_prefix('@') else {
            description.text = line.to_string();
            continue;
        };

        let (name, value) = match annotation.split_once(char::is_whitespace) {
            Some((name, value)) => (name, value.trim()),
            None => (annotation, ""),
        };

        match name {
            "tag" if !value.is_empty() => {
                description.tags.insert(value.to_string());
            }
            "deprecated" => description.deprecated = true,
            "version" if !value.is_empty() => description.version = Some(value.to_string()),
            _ => {}
        }
    }

    description
}

/// Verb describing what a method does to its resource.
pub fn action(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "获取",
        HttpMethod::Post => "创建",
        HttpMethod::Put => "更新",
        HttpMethod::Delete => "删除",
        HttpMethod::Patch => "部分更新",
    }
}

/// Builds a description from the method and the route's resource segment.
///
/// The resource is the last path segment, or the one before it when the last segment is
/// dynamic. Routes ending in a dynamic segment are described as acting on "the specified"
/// resource, except for `POST`.
pub fn synthesize(method: HttpMethod, path: &str, tables: &DescriptionTables) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let ends_dynamic = segments.last().is_some_and(|s| is_dynamic_segment(s));

    let resource_segment = if ends_dynamic {
        segments.len().checked_sub(2).and_then(|i| segments.get(i))
    } else {
        segments.last()
    };

    let noun = resource_segment
        .map(|segment| resource_noun(segment, tables))
        .unwrap_or_else(|| FALLBACK_RESOURCE.to_string());

    if ends_dynamic && method != HttpMethod::Post {
        format!("{}指定{}", action(method), noun)
    } else {
        format!("{}{}", action(method), noun)
    }
}

/// Maps a path segment to its noun, falling back to the segment itself.
fn resource_noun(segment: &str, tables: &DescriptionTables) -> String {
    let bare = segment
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim_start_matches("...");

    match tables.resource_noun(bare) {
        Some(noun) => noun.to_string(),
        None if bare.is_empty() => FALLBACK_RESOURCE.to_string(),
        None => bare.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tables() -> DescriptionTables {
        DescriptionTables::default()
    }

    #[test]
    fn test_known_table_takes_precedence() {
        let comment = "/**\n * 自定义描述\n * @tag custom\n */";
        let description = describe(HttpMethod::Get, "/api/posts", Some(comment), &tables());

        assert_eq!(description, Description::plain("获取文章列表，支持分页和筛选"));
    }

    #[test]
    fn test_doc_comment_used_when_table_misses() {
        let comment = r#"/**
         * 第一行说明
         * 归档文章
         * @tag posts
         * @tag archive
         * @deprecated
         * @version 1.2
         * @param id 文章 ID
         */"#;
        let description = describe(HttpMethod::Put, "/api/posts/{id}/archive", Some(comment), &tables());

        assert_eq!(description.text, "归档文章");
        assert_eq!(
            description.tags.into_iter().collect::<Vec<_>>(),
            vec!["archive".to_string(), "posts".to_string()]
        );
        assert!(description.deprecated);
        assert_eq!(description.version.as_deref(), Some("1.2"));
    }

    #[test]
    fn test_single_line_doc_comment() {
        let description = parse_doc_comment("/** 搜索文章 */");
        assert_eq!(description.text, "搜索文章");
    }

    #[test]
    fn test_annotation_only_comment_falls_back_to_synthesis() {
        let comment = "/**\n * @tag legacy\n */";
        let description = describe(HttpMethod::Delete, "/api/widgets/{id}", Some(comment), &tables());

        assert_eq!(description.text, "删除指定widgets");
        assert!(description.tags.contains("legacy"));
    }

    #[test]
    fn test_synthesize_collection_routes() {
        let tables = tables();
        assert_eq!(synthesize(HttpMethod::Get, "/api/comments/recent", &tables), "获取recent");
        assert_eq!(synthesize(HttpMethod::Delete, "/api/comments", &tables), "删除评论");
        assert_eq!(synthesize(HttpMethod::Patch, "/api/settings", &tables), "部分更新设置");
        assert_eq!(synthesize(HttpMethod::Post, "/api/upload", &tables), "创建文件");
    }

    #[test]
    fn test_synthesize_dynamic_routes_use_specified_variant() {
        let tables = tables();
        assert_eq!(synthesize(HttpMethod::Get, "/api/posts/{id}", &tables), "获取指定文章");
        assert_eq!(synthesize(HttpMethod::Put, "/api/posts/{id}", &tables), "更新指定文章");
        assert_eq!(synthesize(HttpMethod::Delete, "/api/posts/{id}", &tables), "删除指定文章");
        assert_eq!(synthesize(HttpMethod::Patch, "/api/tags/{slug}", &tables), "部分更新指定标签");
        assert_eq!(synthesize(HttpMethod::Post, "/api/posts/{id}", &tables), "创建文章");
    }

    #[test]
    fn test_synthesize_degenerate_paths() {
        let tables = tables();
        assert_eq!(synthesize(HttpMethod::Get, "/{id}", &tables), "获取指定资源");
        assert_eq!(synthesize(HttpMethod::Get, "/", &tables), "获取资源");
        assert_eq!(
            synthesize(HttpMethod::Get, "/api/{kind}/{slug}", &tables),
            "获取指定kind"
        );
    }

    #[test]
    fn test_describe_never_empty() {
        let tables = tables();
        for method in HttpMethod::ALL {
            for path in ["/", "/api", "/api/x/{id}", "/api/files/{...path}"] {
                assert!(!describe(method, path, None, &tables).text.is_empty());
                assert!(!describe(method, path, Some("/** */"), &tables).text.is_empty());
            }
        }
    }
}
