// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_event::CrawlEvent;
use crate::domain::models::target::{Strategy, Target};
use async_trait::async_trait;
use rand::rngs::StdRng;
use std::fmt::Display;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// 单个目标的运行上下文
pub struct TaskContext {
    /// 采集目标
    pub target: Target,
    /// 已创建的输出目录
    pub output_dir: PathBuf,
    /// 任务独享的随机源（User-Agent、文件名后缀）
    pub rng: StdRng,
}

/// 采集任务特质
///
/// 三种策略各有一个实现；调度器和聚合器只依赖这个特质。
/// 实现必须通过 `events` 的终止方法结束，或直接丢弃它。
#[async_trait]
pub trait CrawlTask: Send + Sync {
    /// 所属策略
    fn strategy(&self) -> Strategy;

    /// 针对一个目标执行采集
    async fn run(&self, ctx: TaskContext, events: EventEmitter);
}

/// 单个目标的事件发送器
///
/// `done` 与 `error` 消耗发送器，因此终止事件最多发送一次。
/// 未发送终止事件就被丢弃时（提前返回或 panic）补发一个 `Error`。
pub struct EventEmitter {
    target: String,
    tx: UnboundedSender<CrawlEvent>,
    finished: bool,
}

impl EventEmitter {
    pub fn new(target: impl Into<String>, tx: UnboundedSender<CrawlEvent>) -> Self {
        Self {
            target: target.into(),
            tx,
            finished: false,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    fn send(&self, event: CrawlEvent) {
        if self.tx.send(event).is_err() {
            warn!("Event stream closed, dropping event for {}", self.target);
        }
    }

    pub fn progress(&self, completed: usize, total: usize) {
        self.send(CrawlEvent::Progress {
            target: self.target.clone(),
            completed,
            total,
        });
    }

    pub fn warning(&self, cause: impl Display) {
        self.send(CrawlEvent::Warning {
            target: self.target.clone(),
            cause: cause.to_string(),
        });
    }

    /// 成功结束
    pub fn done(mut self, loaded: u64) {
        self.finished = true;
        self.send(CrawlEvent::Done {
            target: self.target.clone(),
            loaded,
        });
    }

    /// 以致命错误结束，目标保持未完成
    pub fn error(mut self, cause: impl Display) {
        self.finished = true;
        self.send(CrawlEvent::Error {
            target: self.target.clone(),
            cause: cause.to_string(),
        });
    }
}

impl Drop for EventEmitter {
    fn drop(&mut self) {
        if !self.finished {
            self.send(CrawlEvent::Error {
                target: self.target.clone(),
                cause: "task ended without a terminal event".to_string(),
            });
        }
    }
}
