// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::DiscoveryResult;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SearchError {
    #[error("Search engine error: {0}")]
    EngineError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("No results for query: {0}")]
    NoResults(String),
}

/// 一次站内文件类型查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// 限定站点，例如 `kai.ru`
    pub site: String,
    /// 文件类型过滤，例如 `pdf`
    pub filetype: String,
    /// 本次请求使用的 User-Agent
    pub user_agent: String,
}

impl SearchQuery {
    /// 搜索框中的查询文本
    pub fn text(&self) -> String {
        format!("site:{} filetype:{}", self.site, self.filetype)
    }
}

#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Perform a site-restricted, filetype-restricted query
    async fn search(&self, query: &SearchQuery) -> Result<Vec<DiscoveryResult>, SearchError>;

    /// Get the name of the search engine
    fn name(&self) -> &'static str;
}
