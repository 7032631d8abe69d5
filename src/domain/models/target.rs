// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 采集策略
///
/// 每个目标针对每种策略各有一个独立的完成标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 直接遍历目标站点
    Traversal,
    /// 基于搜索引擎的文件发现
    Search,
    /// 网页存档回放
    Archive,
}

impl Strategy {
    /// 所有策略，按编排器启动顺序排列
    pub const ALL: [Strategy; 3] = [Strategy::Archive, Strategy::Search, Strategy::Traversal];

    /// 日志中使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Traversal => "SiteTraversal",
            Strategy::Search => "SearchDiscovery",
            Strategy::Archive => "ArchiveReplay",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::Traversal => write!(f, "traversal"),
            Strategy::Search => write!(f, "search"),
            Strategy::Archive => write!(f, "archive"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown strategy: {0}")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traversal" => Ok(Strategy::Traversal),
            "search" => Ok(Strategy::Search),
            "archive" => Ok(Strategy::Archive),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

/// 采集目标
///
/// 一个待采集的组织。`url` 在目录中唯一，可以是裸域名
/// （`kai.ru`）也可以是完整 URL（`https://www.kaspersky.ru/`）。
/// 三个完成标志只会由核心从 false 翻转为 true，不会被重置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// 目录内标识
    pub id: i32,
    /// 唯一 URL 或域名
    pub url: String,
    /// 组织名称
    pub name: Option<String>,
    /// 行业
    pub industry: Option<String>,
    /// 行业组，优先于行业用作输出目录
    pub industry_group: Option<String>,
    /// 站点遍历完成
    pub traversal_done: bool,
    /// 搜索发现完成
    pub search_done: bool,
    /// 存档回放完成
    pub archive_done: bool,
}

impl Target {
    /// 返回目标在给定策略下的完成标志
    pub fn is_done(&self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Traversal => self.traversal_done,
            Strategy::Search => self.search_done,
            Strategy::Archive => self.archive_done,
        }
    }

    /// 设置给定策略的完成标志
    pub fn set_done(&mut self, strategy: Strategy) {
        match strategy {
            Strategy::Traversal => self.traversal_done = true,
            Strategy::Search => self.search_done = true,
            Strategy::Archive => self.archive_done = true,
        }
    }

    /// 目标的主域名
    ///
    /// 去掉协议、端口、路径以及开头的 `www.`，并转为小写。
    pub fn domain(&self) -> String {
        crate::utils::url_utils::registrable_domain(&self.url)
    }

    /// 输出目录使用的分类名
    ///
    /// 行业组优先，其次为行业；两者都没有时返回 `None`。
    pub fn folder(&self) -> Option<&str> {
        self.industry_group
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.industry.as_deref().filter(|s| !s.is_empty()))
    }
}

/// 新目标（用于目录播种）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTarget {
    pub url: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub industry_group: Option<String>,
}

impl NewTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_industry_group(mut self, group: impl Into<String>) -> Self {
        self.industry_group = Some(group.into());
        self
    }
}

/// 目录概况
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: u64,
    pub pending_traversal: u64,
    pub pending_search: u64,
    pub pending_archive: u64,
}

impl CatalogStats {
    pub fn pending(&self, strategy: Strategy) -> u64 {
        match strategy {
            Strategy::Traversal => self.pending_traversal,
            Strategy::Search => self.pending_search,
            Strategy::Archive => self.pending_archive,
        }
    }
}
