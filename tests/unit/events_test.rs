// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 任务事件与策略日志格式测试

#[cfg(test)]
mod tests {
    use docminer::domain::models::crawl_event::CrawlEvent;
    use docminer::domain::models::target::Strategy;
    use docminer::utils::strategy_log::StrategyLog;
    use tempfile::TempDir;

    #[test]
    fn test_log_lines_carry_strategy_label() {
        let done = CrawlEvent::Done {
            target: "kai.ru".to_string(),
            loaded: 10,
        };
        assert_eq!(done.log_line(Strategy::Traversal), "[SiteTraversal] DONE kai.ru (loaded 10)");

        let failed = CrawlEvent::Error {
            target: "kai.ru".to_string(),
            cause: "no results".to_string(),
        };
        assert_eq!(
            failed.log_line(Strategy::Search),
            "[SearchDiscovery] FAILED kai.ru: no results"
        );
    }

    #[test]
    fn test_events_serialize_with_kind_tag() {
        let event = CrawlEvent::Warning {
            target: "kai.ru".to_string(),
            cause: "timeout".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["target"], "kai.ru");
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_log_is_appended_across_runs() {
        let dir = TempDir::new().unwrap();
        {
            let log = StrategyLog::open(dir.path()).unwrap();
            log.append("[ArchiveReplay] DONE kai.ru (loaded 3)").unwrap();
        }
        let log = StrategyLog::open(dir.path()).unwrap();
        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }
}
