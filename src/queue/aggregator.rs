// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_event::CrawlEvent;
use crate::domain::models::target::Strategy;
use crate::domain::repositories::target_repository::TargetRepository;
use crate::infrastructure::metrics;
use crate::queue::in_flight::InFlightGate;
use crate::utils::errors::OrchestratorError;
use crate::utils::strategy_log::StrategyLog;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

/// 一次策略运行的汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    pub done: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl AggregateSummary {
    /// 已收到终止事件的目标数
    pub fn terminal(&self) -> usize {
        self.done + self.failed
    }
}

/// 结果聚合器
///
/// 单独消费一个策略的事件流，是唯一写完成标志的地方。
pub struct Aggregator {
    strategy: Strategy,
    repository: Arc<dyn TargetRepository>,
    gate: InFlightGate,
    log: Arc<StrategyLog>,
}

impl Aggregator {
    pub fn new(
        strategy: Strategy,
        repository: Arc<dyn TargetRepository>,
        gate: InFlightGate,
        log: Arc<StrategyLog>,
    ) -> Self {
        Self {
            strategy,
            repository,
            gate,
            log,
        }
    }

    async fn write_log(&self, event: &CrawlEvent) {
        let line = event.log_line(self.strategy);
        if let Err(e) = self.log.clone().append_async(line).await {
            warn!("Failed to write {}: {}", self.log.path().display(), e);
        }
    }

    /// 消费事件直到 `expected` 个目标全部结束或事件流关闭
    ///
    /// # 参数
    ///
    /// * `rx` - 策略事件流
    /// * `expected` - 本次运行启动的目标数
    ///
    /// # 返回值
    ///
    /// 汇总；标志写入失败时返回错误并中止策略
    pub async fn run(
        self,
        mut rx: UnboundedReceiver<CrawlEvent>,
        expected: usize,
    ) -> Result<AggregateSummary, OrchestratorError> {
        let mut summary = AggregateSummary::default();

        while summary.terminal() < expected {
            let Some(event) = rx.recv().await else {
                warn!(
                    "[{}] Event stream closed after {}/{} targets",
                    self.strategy.label(),
                    summary.terminal(),
                    expected
                );
                break;
            };

            match &event {
                CrawlEvent::Progress {
                    target,
                    completed,
                    total,
                } => {
                    debug!("[{}] {} {}/{}", self.strategy.label(), target, completed, total);
                }
                CrawlEvent::Warning { target, cause } => {
                    warn!("[{}] {}: {}", self.strategy.label(), target, cause);
                    self.write_log(&event).await;
                    metrics::record_warning(self.strategy);
                    summary.warnings += 1;
                }
                CrawlEvent::Error { target, cause } => {
                    error!("[{}] {} failed: {}", self.strategy.label(), target, cause);
                    self.write_log(&event).await;
                    metrics::record_failed(self.strategy);
                    self.gate.release();
                    summary.failed += 1;
                }
                CrawlEvent::Done { target, loaded } => {
                    self.repository.mark_done(self.strategy, target).await?;
                    info!("[{}] {} done (loaded {})", self.strategy.label(), target, loaded);
                    self.write_log(&event).await;
                    metrics::record_done(self.strategy);
                    self.gate.release();
                    summary.done += 1;
                }
            }
        }

        Ok(summary)
    }
}
