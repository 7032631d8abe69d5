// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_event::CrawlEvent;
use crate::domain::models::target::Target;
use crate::infrastructure::metrics;
use crate::infrastructure::storage::LocalStorage;
use crate::queue::in_flight::InFlightGate;
use crate::utils::errors::OrchestratorError;
use crate::workers::worker::{CrawlTask, EventEmitter, TaskContext};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 按 URL 去重，保持原有顺序
pub fn unique_targets(targets: Vec<Target>) -> Vec<Target> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|t| seen.insert(t.url.clone()))
        .collect()
}

/// 有界调度器
///
/// 对每个目标：等待空闲槽位，创建输出目录，启动任务，
/// 然后等到距本次启动至少 `interval` 再处理下一个目标。
pub struct Dispatcher {
    task: Arc<dyn CrawlTask>,
    storage: LocalStorage,
    gate: InFlightGate,
    interval: Duration,
    events: UnboundedSender<CrawlEvent>,
}

impl Dispatcher {
    pub fn new(
        task: Arc<dyn CrawlTask>,
        storage: LocalStorage,
        gate: InFlightGate,
        interval: Duration,
        events: UnboundedSender<CrawlEvent>,
    ) -> Self {
        Self {
            task,
            storage,
            gate,
            interval,
            events,
        }
    }

    /// 启动所有目标的任务，返回任务集合
    ///
    /// 返回时事件发送端随调度器一起释放，任务结束后事件流自然关闭。
    pub async fn dispatch(self, targets: Vec<Target>) -> Result<JoinSet<()>, OrchestratorError> {
        let strategy = self.task.strategy();
        let mut tasks = JoinSet::new();
        let mut launched = HashSet::new();
        let count = targets.len();

        for (i, target) in targets.into_iter().enumerate() {
            if !launched.insert(target.url.clone()) {
                warn!("Skipping duplicate target {}", target.url);
                continue;
            }

            self.gate.acquire().await?;
            let started = Instant::now();
            let emitter = EventEmitter::new(target.url.clone(), self.events.clone());

            match self.storage.prepare_target_dir(&target).await {
                Ok(output_dir) => {
                    debug!(
                        "Launching {} for {} ({} in flight)",
                        strategy,
                        target.url,
                        self.gate.in_flight()
                    );
                    let ctx = TaskContext {
                        target,
                        output_dir,
                        rng: StdRng::seed_from_u64(rand::random()),
                    };
                    let task = self.task.clone();
                    tasks.spawn(async move { task.run(ctx, emitter).await });
                    metrics::record_launched(strategy);
                }
                Err(e) => emitter.error(format!("cannot create output directory: {}", e)),
            }

            if i + 1 < count {
                tokio::time::sleep_until(started + self.interval).await;
            }
        }

        Ok(tasks)
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
