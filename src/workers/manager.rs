// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RunSettings;
use crate::domain::models::target::Strategy;
use crate::domain::repositories::target_repository::TargetRepository;
use crate::infrastructure::storage::LocalStorage;
use crate::queue::aggregator::{AggregateSummary, Aggregator};
use crate::queue::dispatcher::{unique_targets, Dispatcher};
use crate::queue::in_flight::InFlightGate;
use crate::utils::errors::{OrchestratorError, StorageError};
use crate::utils::strategy_log::StrategyLog;
use crate::workers::worker::CrawlTask;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// 单个策略的运行器
///
/// 持有该策略的调度器、聚合器与日志，一次 `run` 处理所有未完成的目标。
pub struct StrategyRunner {
    strategy: Strategy,
    storage: LocalStorage,
    gate: InFlightGate,
    interval: Duration,
    repository: Arc<dyn TargetRepository>,
    task: Arc<dyn CrawlTask>,
}

impl StrategyRunner {
    pub fn new(
        settings: &RunSettings,
        repository: Arc<dyn TargetRepository>,
        task: Arc<dyn CrawlTask>,
    ) -> Self {
        Self {
            strategy: settings.strategy,
            storage: LocalStorage::new(settings.path.clone()),
            gate: InFlightGate::new(settings.workers),
            interval: settings.interval,
            repository,
            task,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// 本策略的在途闸门，可在运行期间采样
    pub fn in_flight_gate(&self) -> InFlightGate {
        self.gate.clone()
    }

    /// 运行到所有已启动目标都收到终止事件为止
    ///
    /// # 返回值
    ///
    /// * `Ok(AggregateSummary)` - 本次运行的汇总
    /// * `Err(OrchestratorError)` - 目录、存储或标志写入失败，策略中止
    pub async fn run(self) -> Result<AggregateSummary, OrchestratorError> {
        let label = self.strategy.label();
        let log = Arc::new(StrategyLog::open(self.storage.base_path()).map_err(StorageError::Io)?);

        let folders = self.repository.industry_folders().await?;
        self.storage.prepare_folders(&folders).await?;

        let targets = unique_targets(self.repository.pending(self.strategy).await?);
        let expected = targets.len();
        info!(
            "[{}] {} pending targets, {} workers, interval {:?}",
            label,
            expected,
            self.gate.capacity(),
            self.interval
        );

        let gate = self.gate.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(
            self.task.clone(),
            self.storage.clone(),
            gate.clone(),
            self.interval,
            tx,
        );
        let aggregator = Aggregator::new(self.strategy, self.repository.clone(), gate, log.clone());

        let (mut tasks, summary) =
            tokio::try_join!(dispatcher.dispatch(targets), aggregator.run(rx, expected))?;

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("[{}] Task exited abnormally: {}", label, e);
            }
        }

        let line = format!(
            "[{}] Run finished: {} completed, {} unsuccessful, {} warnings",
            label, summary.done, summary.failed, summary.warnings
        );
        info!("{}", line);
        if let Err(e) = log.clone().append_async(line).await {
            warn!("Failed to write {}: {}", log.path().display(), e);
        }

        Ok(summary)
    }
}

/// 编排器
///
/// 并行运行各策略；一个策略出错不影响其他策略。
#[derive(Default)]
pub struct Orchestrator {
    runners: Vec<StrategyRunner>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, runner: StrategyRunner) {
        self.runners.push(runner);
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// 运行所有策略直到全部结束
    pub async fn run(self) -> Vec<(Strategy, Result<AggregateSummary, OrchestratorError>)> {
        let runs = self.runners.into_iter().map(|runner| async move {
            let strategy = runner.strategy();
            info!("[{}] Starting", strategy.label());
            let result = runner.run().await;
            match &result {
                Ok(summary) => info!(
                    "[{}] Finished with {} completed targets",
                    strategy.label(),
                    summary.done
                ),
                Err(e) => error!("[{}] Aborted: {}", strategy.label(), e),
            }
            (strategy, result)
        });
        join_all(runs).await
    }
}
