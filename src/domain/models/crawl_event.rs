// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::target::Strategy;
use serde::Serialize;
use std::fmt;

/// 采集任务事件
///
/// 每个运行中的采集任务把事件发送到所属策略共享的事件流上。
/// 对同一目标，`Error` 与 `Done` 在任务生命周期内恰好出现一个，
/// `Progress` 与 `Warning` 可以在它之前出现任意次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// 进度
    Progress {
        target: String,
        completed: usize,
        total: usize,
    },
    /// 可恢复错误，任务继续
    Warning { target: String, cause: String },
    /// 任务级致命错误，终止事件
    Error { target: String, cause: String },
    /// 任务结束，终止事件；`loaded` 为字节数或条目数，取决于策略
    Done { target: String, loaded: u64 },
}

impl CrawlEvent {
    /// 事件所属目标
    pub fn target(&self) -> &str {
        match self {
            CrawlEvent::Progress { target, .. }
            | CrawlEvent::Warning { target, .. }
            | CrawlEvent::Error { target, .. }
            | CrawlEvent::Done { target, .. } => target,
        }
    }

    /// 是否为终止事件
    pub fn is_terminal(&self) -> bool {
        matches!(self, CrawlEvent::Error { .. } | CrawlEvent::Done { .. })
    }

    /// 写入策略日志文件时使用的单行表示
    pub fn log_line(&self, strategy: Strategy) -> String {
        format!("[{}] {}", strategy.label(), self)
    }
}

impl fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrawlEvent::Progress {
                target,
                completed,
                total,
            } => write!(f, "PROGRESS {}: {}/{}", target, completed, total),
            CrawlEvent::Warning { target, cause } => write!(f, "WARNING {}: {}", target, cause),
            CrawlEvent::Error { target, cause } => write!(f, "FAILED {}: {}", target, cause),
            CrawlEvent::Done { target, loaded } => write!(f, "DONE {} (loaded {})", target, loaded),
        }
    }
}
