// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 编排器测试
///
/// 使用脚本化的采集任务验证并发上限、完成标志以及策略之间的隔离

#[cfg(test)]
mod tests {
    use super::super::helpers::*;
    use async_trait::async_trait;
    use docminer::domain::models::target::{NewTarget, Strategy};
    use docminer::domain::repositories::target_repository::TargetRepository;
    use docminer::queue::in_flight::InFlightGate;
    use docminer::infrastructure::repositories::memory_target_repo::InMemoryTargetRepository;
    use docminer::workers::manager::{Orchestrator, StrategyRunner};
    use docminer::workers::worker::{CrawlTask, EventEmitter, TaskContext};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, OnceLock};
    use std::time::Duration;
    use tempfile::TempDir;

    /// 按目标 ID 决定结果：偶数成功，3 的倍数额外报警告，其余失败
    struct ScriptedTask {
        strategy: Strategy,
        running: AtomicUsize,
        peak: AtomicUsize,
        gate: OnceLock<InFlightGate>,
        gate_peak: AtomicUsize,
    }

    impl ScriptedTask {
        fn new(strategy: Strategy) -> Self {
            Self {
                strategy,
                running: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                gate: OnceLock::new(),
                gate_peak: AtomicUsize::new(0),
            }
        }

        fn sample_gate(&self) {
            if let Some(gate) = self.gate.get() {
                self.gate_peak.fetch_max(gate.in_flight(), Ordering::SeqCst);
            }
        }
    }

    #[async_trait]
    impl CrawlTask for ScriptedTask {
        fn strategy(&self) -> Strategy {
            self.strategy
        }

        async fn run(&self, ctx: TaskContext, events: EventEmitter) {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.sample_gate();
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.sample_gate();
            self.running.fetch_sub(1, Ordering::SeqCst);

            let id = ctx.target.id;
            if id % 3 == 0 {
                events.warning("slow mirror");
            }
            if id % 2 == 0 {
                events.done(id as u64);
            } else {
                events.error("scripted failure");
            }
        }
    }

    fn catalog(size: usize) -> Arc<InMemoryTargetRepository> {
        let repo = Arc::new(InMemoryTargetRepository::new());
        for i in 0..size {
            repo.insert(NewTarget::new(format!("site{}.ru", i))).unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_hundred_targets_respect_ceiling_and_flags_follow_done() {
        let dir = TempDir::new().unwrap();
        let repo = catalog(100);
        let task = Arc::new(ScriptedTask::new(Strategy::Archive));

        let runner = StrategyRunner::new(
            &run_settings(Strategy::Archive, dir.path(), 5),
            repo.clone(),
            task.clone(),
        );
        let _ = task.gate.set(runner.in_flight_gate());
        let summary = runner.run().await.unwrap();

        assert!(task.peak.load(Ordering::SeqCst) <= 5);
        let gate_peak = task.gate_peak.load(Ordering::SeqCst);
        assert!((1..=5).contains(&gate_peak));
        assert_eq!(summary.terminal(), 100);
        assert_eq!(summary.done + summary.failed, 100);

        for target in repo.pending(Strategy::Archive).await.unwrap() {
            assert_eq!(target.id % 2, 1, "{} should be done", target.url);
        }
        let done = 100 - repo.pending(Strategy::Archive).await.unwrap().len();
        assert_eq!(done, summary.done);
        assert!(summary.warnings > 0);
    }

    #[tokio::test]
    async fn test_strategies_run_independently() {
        let dir = TempDir::new().unwrap();
        let repo = catalog(6);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let mut orchestrator = Orchestrator::new();
        orchestrator.add(StrategyRunner::new(
            &run_settings(Strategy::Search, &dir.path().join("search"), 2),
            repo.clone(),
            Arc::new(ScriptedTask::new(Strategy::Search)),
        ));
        orchestrator.add(StrategyRunner::new(
            &run_settings(Strategy::Traversal, &blocker.join("traversal"), 2),
            repo.clone(),
            Arc::new(ScriptedTask::new(Strategy::Traversal)),
        ));

        let results = orchestrator.run().await;
        assert_eq!(results.len(), 2);

        let (strategy, search) = &results[0];
        assert_eq!(*strategy, Strategy::Search);
        assert_eq!(search.as_ref().unwrap().terminal(), 6);

        let (strategy, traversal) = &results[1];
        assert_eq!(*strategy, Strategy::Traversal);
        assert!(traversal.is_err());

        assert_eq!(repo.pending(Strategy::Traversal).await.unwrap().len(), 6);
        assert!(repo.pending(Strategy::Search).await.unwrap().len() < 6);
    }
}
