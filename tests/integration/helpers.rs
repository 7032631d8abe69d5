// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use docminer::config::settings::RunSettings;
use docminer::domain::models::target::{NewTarget, Strategy};
use docminer::engines::traits::{EngineError, FetchRequest, FetchResponse, Fetcher};
use docminer::infrastructure::repositories::target_repo_impl::TargetRepositoryImpl;
use migration::{Migrator, MigratorTrait};
use parking_lot::Mutex;
use sea_orm::Database;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// 一个足够大（超过 25 KiB）、没有站内链接的 HTML 页面
pub fn large_page(title: &str) -> Vec<u8> {
    let mut page = format!("<!DOCTYPE html><html><head><title>{}</title></head><body>", title);
    while page.len() < 30 * 1024 {
        page.push_str("<p>Annual report and financial statements.</p>");
    }
    page.push_str("</body></html>");
    page.into_bytes()
}

/// 按 URL 返回固定内容的抓取器，未登记的 URL 返回 503
pub struct StubFetcher {
    pages: HashMap<String, Vec<u8>>,
    delay: Duration,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(mut self, url: &str, body: Vec<u8>) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn lookup(&self, url: &str) -> Result<Vec<u8>, EngineError> {
        let key = url.trim_end_matches('/');
        self.pages
            .get(key)
            .cloned()
            .ok_or(EngineError::Status(503))
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        self.requests.lock().push(request.url.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let body = self.lookup(&request.url)?;
        Ok(FetchResponse {
            url: request.url.clone(),
            status_code: 200,
            content_type: Some("text/html".to_string()),
            body: body.into(),
            truncated: false,
        })
    }

    async fn download_to(&self, request: &FetchRequest, dest: &Path) -> Result<u64, EngineError> {
        let body = self.lookup(&request.url)?;
        tokio::fs::write(dest, &body).await?;
        Ok(body.len() as u64)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// 内存 SQLite 目录，已执行迁移并播种给定目标
pub async fn seeded_catalog(targets: Vec<NewTarget>) -> Arc<TargetRepositoryImpl> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let repo = TargetRepositoryImpl::new(Arc::new(db));
    for target in targets {
        repo.insert(target).await.unwrap();
    }
    Arc::new(repo)
}

pub fn run_settings(strategy: Strategy, path: &Path, workers: usize) -> RunSettings {
    RunSettings {
        strategy,
        enabled: true,
        path: path.to_path_buf(),
        workers,
        interval: Duration::ZERO,
    }
}

/// 日志文件中的终止记录行
pub fn terminal_lines(log: &str) -> Vec<&str> {
    log.lines()
        .filter(|line| line.contains(" DONE ") || line.contains(" FAILED "))
        .collect()
}
