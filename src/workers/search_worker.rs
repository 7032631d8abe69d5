// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SearchSettings;
use crate::domain::models::target::Strategy;
use crate::domain::search::engine::{SearchEngine, SearchQuery};
use crate::engines::traits::{FetchRequest, Fetcher};
use crate::infrastructure::storage::LocalStorage;
use crate::utils::name_escaper::escape;
use crate::utils::url_utils::last_segment;
use crate::workers::worker::{CrawlTask, EventEmitter, TaskContext};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use url::Url;

/// 下载文件的主名和扩展名
///
/// 主名为转义后的最后一段路径（为空时为 `index`）；
/// 缺少目标扩展名时补上。
pub fn download_name(url: &Url, extension: &str) -> (String, String) {
    let segment = last_segment(url);
    let name = if segment.is_empty() {
        "index".to_string()
    } else {
        escape(&segment)
    };

    let ext = format!(".{}", extension.trim_start_matches('.'));
    match name.strip_suffix(&ext) {
        Some(stem) if !stem.is_empty() => (stem.to_string(), ext),
        _ => (name, ext),
    }
}

/// 搜索发现任务
///
/// 用 `site:` 与 `filetype:` 查询搜索引擎，逐个下载命中结果。
pub struct SearchDiscoveryTask {
    engine: Arc<dyn SearchEngine>,
    fetcher: Arc<dyn Fetcher>,
    storage: LocalStorage,
    extension: String,
    max_body_bytes: u64,
    user_agents: Vec<String>,
}

impl SearchDiscoveryTask {
    pub fn new(
        engine: Arc<dyn SearchEngine>,
        fetcher: Arc<dyn Fetcher>,
        storage: LocalStorage,
        settings: &SearchSettings,
    ) -> Self {
        Self {
            engine,
            fetcher,
            storage,
            extension: settings.extension.trim_start_matches('.').to_string(),
            max_body_bytes: settings.max_body_bytes(),
            user_agents: settings.user_agents.clone(),
        }
    }
}

#[async_trait]
impl CrawlTask for SearchDiscoveryTask {
    fn strategy(&self) -> Strategy {
        Strategy::Search
    }

    #[instrument(skip_all, fields(target = %ctx.target.url))]
    async fn run(&self, mut ctx: TaskContext, events: EventEmitter) {
        let user_agent = self
            .user_agents
            .choose(&mut ctx.rng)
            .cloned()
            .unwrap_or_default();
        let query = SearchQuery {
            site: ctx.target.domain(),
            filetype: self.extension.clone(),
            user_agent: user_agent.clone(),
        };

        let results = match self.engine.search(&query).await {
            Ok(results) => results,
            Err(e) => {
                events.error(format!("{} search failed: {}", self.engine.name(), e));
                return;
            }
        };

        if results.is_empty() {
            events.error(format!("{} returned no results for {}", self.engine.name(), query.text()));
            return;
        }

        let total = results.len();
        let mut downloaded: u64 = 0;
        for (i, result) in results.iter().enumerate() {
            match Url::parse(&result.url) {
                Ok(url) => {
                    let (stem, ext) = download_name(&url, &self.extension);
                    let dest = self
                        .storage
                        .unique_path(&ctx.output_dir, &stem, &ext, &mut ctx.rng)
                        .await;
                    let request = FetchRequest::new(url.as_str(), self.max_body_bytes)
                        .with_header("User-Agent", user_agent.as_str());
                    match self.fetcher.download_to(&request, &dest).await {
                        Ok(bytes) => {
                            downloaded += 1;
                            debug!("#{} {} -> {} ({} bytes)", result.rank, url, dest.display(), bytes);
                        }
                        Err(e) => events.warning(format!("{}: {}", url, e)),
                    }
                }
                Err(e) => events.warning(format!("{}: {}", result.url, e)),
            }
            events.progress(i + 1, total);
        }

        info!("{} downloaded {}/{} results", query.site, downloaded, total);
        events.done(downloaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;
    use crate::domain::models::crawl_event::CrawlEvent;
    use crate::domain::models::search_result::DiscoveryResult;
    use crate::domain::models::target::Target;
    use crate::domain::search::engine::SearchError;
    use crate::engines::traits::{EngineError, FetchResponse};
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    struct StaticEngine {
        results: Result<Vec<DiscoveryResult>, SearchError>,
        queries: Mutex<Vec<SearchQuery>>,
    }

    #[async_trait]
    impl SearchEngine for StaticEngine {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<DiscoveryResult>, SearchError> {
            self.queries.lock().push(query.clone());
            self.results.clone()
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    struct FileFetcher;

    #[async_trait]
    impl Fetcher for FileFetcher {
        async fn fetch(&self, _request: &FetchRequest) -> Result<FetchResponse, EngineError> {
            Err(EngineError::Other("not used".to_string()))
        }

        async fn download_to(&self, request: &FetchRequest, dest: &Path) -> Result<u64, EngineError> {
            if request.url.contains("broken") {
                return Err(EngineError::Status(404));
            }
            tokio::fs::write(dest, b"%PDF-1.4").await?;
            Ok(8)
        }

        fn name(&self) -> &'static str {
            "file"
        }
    }

    async fn run(engine: Arc<StaticEngine>, dir: &TempDir) -> Vec<CrawlEvent> {
        let settings = Settings::from_toml("").unwrap();
        let task = SearchDiscoveryTask::new(
            engine,
            Arc::new(FileFetcher),
            LocalStorage::new(dir.path()),
            &settings.search,
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = TaskContext {
            target: Target {
                id: 1,
                url: "https://www.kai.ru/".to_string(),
                name: None,
                industry: None,
                industry_group: None,
                traversal_done: false,
                search_done: false,
                archive_done: false,
            },
            output_dir: dir.path().to_path_buf(),
            rng: StdRng::seed_from_u64(3),
        };
        task.run(ctx, EventEmitter::new("https://www.kai.ru/", tx)).await;

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    fn hit(rank: usize, url: &str) -> DiscoveryResult {
        DiscoveryResult::new(rank, url.to_string(), String::new(), String::new())
    }

    #[test]
    fn test_download_name() {
        let url = Url::parse("https://kai.ru/files/report.pdf").unwrap();
        assert_eq!(download_name(&url, "pdf"), ("report".to_string(), ".pdf".to_string()));

        let url = Url::parse("https://kai.ru/download?id=7").unwrap();
        assert_eq!(download_name(&url, "pdf"), ("download".to_string(), ".pdf".to_string()));

        let url = Url::parse("https://kai.ru/").unwrap();
        assert_eq!(download_name(&url, ".pdf"), ("index".to_string(), ".pdf".to_string()));
    }

    #[tokio::test]
    async fn test_downloads_every_hit_and_reports_progress() {
        let engine = Arc::new(StaticEngine {
            results: Ok(vec![
                hit(1, "https://kai.ru/a/report.pdf"),
                hit(2, "https://kai.ru/b/report.pdf"),
                hit(3, "https://kai.ru/broken.pdf"),
            ]),
            queries: Mutex::new(Vec::new()),
        });
        let dir = TempDir::new().unwrap();

        let events = run(engine.clone(), &dir).await;

        let query = engine.queries.lock()[0].clone();
        assert_eq!(query.text(), "site:kai.ru filetype:pdf");
        assert!(!query.user_agent.is_empty());

        let progress = events
            .iter()
            .filter(|e| matches!(e, CrawlEvent::Progress { .. }))
            .count();
        let warnings = events
            .iter()
            .filter(|e| matches!(e, CrawlEvent::Warning { .. }))
            .count();
        assert_eq!(progress, 3);
        assert_eq!(warnings, 1);
        assert!(matches!(events.last(), Some(CrawlEvent::Done { loaded: 2, .. })));

        // same name twice: second copy gets a random suffix
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
        assert!(dir.path().join("report.pdf").exists());
    }

    #[tokio::test]
    async fn test_failed_query_is_terminal_error() {
        let engine = Arc::new(StaticEngine {
            results: Err(SearchError::NoResults("site:kai.ru filetype:pdf".to_string())),
            queries: Mutex::new(Vec::new()),
        });
        let dir = TempDir::new().unwrap();

        let events = run(engine, &dir).await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CrawlEvent::Error { .. }));
    }

    #[tokio::test]
    async fn test_empty_result_list_is_terminal_error() {
        let engine = Arc::new(StaticEngine {
            results: Ok(Vec::new()),
            queries: Mutex::new(Vec::new()),
        });
        let dir = TempDir::new().unwrap();

        let events = run(engine, &dir).await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            CrawlEvent::Error { cause, .. } => assert!(cause.contains("no results")),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
