// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Index query failed: {0}")]
    Index(String),
    #[error("Record fetch failed: {0}")]
    Fetch(String),
    #[error("Malformed record: {0}")]
    Record(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 存档客户端自己的事件形状
///
/// 回放任务负责把它转换为统一的采集事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveEvent {
    /// 已处理的记录数
    Progress { url: String, done: usize, total: usize },
    /// 记录级失败（`fatal == false`）或索引级失败（`fatal == true`）
    Failed {
        url: String,
        cause: String,
        fatal: bool,
    },
    /// 回放结束，`saved` 为写盘的记录数
    Finished { url: String, saved: u64 },
}

/// 一次站点回放请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// 站点域名
    pub site: String,
    /// 输出目录
    pub save_dir: PathBuf,
}

/// 存档索引客户端
///
/// 客户端自行负责节奏控制和大小限制；调用方只消费它的事件流。
#[async_trait]
pub trait ArchiveIndex: Send + Sync {
    /// 回放站点的历史抓取内容，事件写入 `events`，返回即表示结束
    async fn fetch_site(&self, request: ArchiveRequest, events: mpsc::Sender<ArchiveEvent>);

    fn name(&self) -> &'static str;
}
