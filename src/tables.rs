//! Static lookup tables used to describe endpoints and groups.
//!
//! The tables are plain data. [`DescriptionTables::default`] carries the built-in entries
//! for the blog resources; additional entries can be layered on top from a YAML or JSON
//! file with [`DescriptionTables::load_overrides`].

use crate::error::{Error, Result};
use crate::extractor::HttpMethod;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Hand-maintained descriptions for endpoints, resource nouns and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionTables {
    /// Route path -> method -> description, for known stable endpoints
    #[serde(default)]
    pub endpoints: BTreeMap<String, BTreeMap<HttpMethod, String>>,
    /// Resource path segment -> human noun
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
    /// Top-level group name -> group description
    #[serde(default)]
    pub groups: BTreeMap<String, String>,
}

const BUILTIN_ENDPOINTS: &[(&str, HttpMethod, &str)] = &[
    ("/api/posts", HttpMethod::Get, "获取文章列表，支持分页和筛选"),
    ("/api/posts", HttpMethod::Post, "创建新文章"),
    ("/api/categories", HttpMethod::Get, "获取所有分类"),
    ("/api/categories", HttpMethod::Post, "创建新分类"),
    ("/api/tags", HttpMethod::Get, "获取所有标签"),
    ("/api/tags", HttpMethod::Post, "创建新标签"),
    ("/api/comments", HttpMethod::Get, "获取评论列表"),
    ("/api/comments", HttpMethod::Post, "发表评论"),
    ("/api/auth/login", HttpMethod::Post, "用户登录"),
    ("/api/auth/register", HttpMethod::Post, "用户注册"),
    ("/api/auth/logout", HttpMethod::Post, "退出登录"),
    ("/api/users/me", HttpMethod::Get, "获取当前登录用户信息"),
    ("/api/docs", HttpMethod::Get, "获取 API 文档数据"),
];

const BUILTIN_RESOURCES: &[(&str, &str)] = &[
    ("posts", "文章"),
    ("post", "文章"),
    ("categories", "分类"),
    ("category", "分类"),
    ("tags", "标签"),
    ("tag", "标签"),
    ("comments", "评论"),
    ("comment", "评论"),
    ("users", "用户"),
    ("user", "用户"),
    ("profile", "个人资料"),
    ("auth", "认证"),
    ("login", "登录"),
    ("register", "注册"),
    ("upload", "文件"),
    ("uploads", "文件"),
    ("media", "媒体文件"),
    ("search", "搜索结果"),
    ("stats", "统计数据"),
    ("settings", "设置"),
    ("likes", "点赞"),
    ("favorites", "收藏"),
    ("docs", "接口文档"),
];

const BUILTIN_GROUPS: &[(&str, &str)] = &[
    ("posts", "文章管理相关接口"),
    ("categories", "分类管理相关接口"),
    ("tags", "标签管理相关接口"),
    ("comments", "评论管理相关接口"),
    ("users", "用户管理相关接口"),
    ("auth", "用户认证相关接口"),
    ("upload", "文件上传相关接口"),
    ("search", "搜索相关接口"),
    ("docs", "API 文档相关接口"),
];

impl Default for DescriptionTables {
    fn default() -> Self {
        let mut endpoints: BTreeMap<String, BTreeMap<HttpMethod, String>> = BTreeMap::new();
        for (path, method, description) in BUILTIN_ENDPOINTS {
            endpoints
                .entry(path.to_string())
                .or_default()
                .insert(*method, description.to_string());
        }

        Self {
            endpoints,
            resources: to_map(BUILTIN_RESOURCES),
            groups: to_map(BUILTIN_GROUPS),
        }
    }
}

fn to_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl DescriptionTables {
    /// Tables with no entries at all.
    pub fn empty() -> Self {
        Self {
            endpoints: BTreeMap::new(),
            resources: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Reads a table file (YAML or JSON) and layers it over the built-in tables.
    ///
    /// Entries in the file replace built-in entries with the same key.
    pub fn load_overrides(path: &Path) -> Result<Self> {
        debug!("Loading description tables from {}", path.display());

        let content = fs::read_to_string(path)?;
        let overrides: DescriptionTables =
            serde_yaml::from_str(&content).map_err(|e| Error::ConfigError {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut tables = Self::default();
        tables.extend(overrides);
        Ok(tables)
    }

    /// Merges `other` into `self`; `other` wins on conflicting keys.
    pub fn extend(&mut self, other: DescriptionTables) {
        for (path, methods) in other.endpoints {
            self.endpoints.entry(path).or_default().extend(methods);
        }
        self.resources.extend(other.resources);
        self.groups.extend(other.groups);
    }

    pub fn known_description(&self, method: HttpMethod, path: &str) -> Option<&str> {
        self.endpoints
            .get(path)
            .and_then(|methods| methods.get(&method))
            .map(String::as_str)
    }

    pub fn resource_noun(&self, segment: &str) -> Option<&str> {
        self.resources.get(segment).map(String::as_str)
    }

    pub fn group_description(&self, group: &str) -> Option<&str> {
        self.groups.get(group).map(String::as_str)
    }
}
