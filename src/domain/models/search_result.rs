// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 单条搜索结果
///
/// 按查询临时生成，由下载步骤立即消费，不持久化。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DiscoveryResult {
    /// 排名，从 1 开始
    pub rank: usize,
    pub url: String,
    pub title: String,
    pub snippet: String,
}

impl DiscoveryResult {
    pub fn new(rank: usize, url: String, title: String, snippet: String) -> Self {
        Self {
            rank,
            url,
            title,
            snippet,
        }
    }
}
