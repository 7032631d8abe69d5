// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 站点遍历流水线测试
///
/// 真实的目录仓库、调度器、聚合器和遍历任务，只替换网络层

#[cfg(test)]
mod tests {
    use super::super::helpers::*;
    use docminer::config::settings::Settings;
    use docminer::domain::models::target::{NewTarget, Strategy};
    use docminer::domain::repositories::target_repository::TargetRepository;
    use docminer::infrastructure::storage::LocalStorage;
    use docminer::utils::strategy_log::LOG_FILE_NAME;
    use docminer::workers::manager::StrategyRunner;
    use docminer::workers::site_worker::SiteTraversalTask;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn catalog() -> Vec<NewTarget> {
        vec![
            NewTarget::new("kai.ru").with_industry("Education"),
            NewTarget::new("https://www.mail.ru/").with_industry_group("Internet Services"),
            NewTarget::new("down.ru"),
        ]
    }

    fn fetcher() -> Arc<StubFetcher> {
        Arc::new(
            StubFetcher::new()
                .with_page("https://kai.ru", large_page("KAI"))
                .with_page("https://mail.ru", large_page("Mail"))
                .with_delay(Duration::from_millis(20)),
        )
    }

    fn runner(repo: Arc<dyn TargetRepository>, fetcher: Arc<StubFetcher>, dir: &TempDir) -> StrategyRunner {
        let settings = Settings::from_toml("").unwrap();
        let task = SiteTraversalTask::new(fetcher, LocalStorage::new(dir.path()), &settings.traversal);
        StrategyRunner::new(&run_settings(Strategy::Traversal, dir.path(), 2), repo, Arc::new(task))
    }

    #[tokio::test]
    async fn test_traversal_run_sets_flags_and_logs_every_target() {
        let dir = TempDir::new().unwrap();
        let repo = seeded_catalog(catalog()).await;

        let summary = runner(repo.clone(), fetcher(), &dir).run().await.unwrap();
        assert_eq!(summary.done, 2);
        assert_eq!(summary.failed, 1);

        let pending: Vec<String> = repo
            .pending(Strategy::Traversal)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.url)
            .collect();
        assert_eq!(pending, vec!["down.ru".to_string()]);

        // 其他策略的标志保持不变
        assert_eq!(repo.pending(Strategy::Search).await.unwrap().len(), 3);

        let log = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert!(log.lines().next().unwrap().ends_with("Log started"));
        let terminal = terminal_lines(&log);
        assert_eq!(terminal.len(), 3);
        assert_eq!(terminal.iter().filter(|l| l.contains(" DONE ")).count(), 2);
        assert!(terminal.iter().any(|l| l.contains("FAILED down.ru")));

        let kai_dir = dir.path().join("Education").join("kai.ru");
        assert!(std::fs::read_dir(&kai_dir).unwrap().next().is_some());
        let mail_dir = dir
            .path()
            .join("Internet Services")
            .join(urlencoding::encode("https://www.mail.ru/").as_ref());
        assert!(mail_dir.is_dir());
    }

    #[tokio::test]
    async fn test_three_reachable_targets_all_complete() {
        let dir = TempDir::new().unwrap();
        let repo = seeded_catalog(catalog()).await;
        let fetcher = Arc::new(
            StubFetcher::new()
                .with_page("https://kai.ru", large_page("KAI"))
                .with_page("https://mail.ru", large_page("Mail"))
                .with_page("https://down.ru", large_page("Down"))
                .with_delay(Duration::from_millis(20)),
        );

        let summary = runner(repo.clone(), fetcher, &dir).run().await.unwrap();
        assert_eq!(summary.done, 3);
        assert!(repo.pending(Strategy::Traversal).await.unwrap().is_empty());

        let log = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        let terminal = terminal_lines(&log);
        assert_eq!(terminal.len(), 3);
        assert!(terminal.iter().all(|l| l.contains("[SiteTraversal] DONE ")));
    }

    #[tokio::test]
    async fn test_second_run_only_retries_unfinished_targets() {
        let dir = TempDir::new().unwrap();
        let repo = seeded_catalog(catalog()).await;

        runner(repo.clone(), fetcher(), &dir).run().await.unwrap();

        let second = fetcher();
        let summary = runner(repo.clone(), second.clone(), &dir).run().await.unwrap();
        assert_eq!(summary.done, 0);
        assert_eq!(summary.failed, 1);
        assert!(second.requests().iter().all(|url| url.contains("down.ru")));

        let log = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(log.lines().filter(|l| l.ends_with("Log started")).count(), 2);
        assert_eq!(terminal_lines(&log).len(), 4);
    }

    #[tokio::test]
    async fn test_empty_catalog_finishes_immediately() {
        let dir = TempDir::new().unwrap();
        let repo = seeded_catalog(Vec::new()).await;

        let summary = runner(repo, fetcher(), &dir).run().await.unwrap();
        assert_eq!(summary.terminal(), 0);
        assert!(dir.path().join(LOG_FILE_NAME).is_file());
    }
}
