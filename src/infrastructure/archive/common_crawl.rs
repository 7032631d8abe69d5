// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ArchiveSettings;
use crate::domain::archive::index::{ArchiveError, ArchiveEvent, ArchiveIndex, ArchiveRequest};
use crate::engines::traits::{FetchRequest, Fetcher};
use crate::infrastructure::archive::warc;
use crate::utils::content_sniffer::{classify, Extension};
use crate::utils::name_escaper::escape;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// 索引响应的最大读取字节数
const MAX_INDEX_BYTES: u64 = 32 * 1024 * 1024;
/// 单条记录片段的最大读取字节数
const MAX_RECORD_BYTES: u64 = 64 * 1024 * 1024;

/// 索引中的一行
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IndexRecord {
    pub url: String,
    pub filename: String,
    pub offset: String,
    pub length: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl IndexRecord {
    /// `Range` 请求头的取值
    pub fn byte_range(&self) -> Result<String, ArchiveError> {
        let offset: u64 = self
            .offset
            .parse()
            .map_err(|_| ArchiveError::Record(format!("bad offset {}", self.offset)))?;
        let length: u64 = self
            .length
            .parse()
            .map_err(|_| ArchiveError::Record(format!("bad length {}", self.length)))?;
        if length == 0 {
            return Err(ArchiveError::Record("empty record".into()));
        }
        Ok(format!("bytes={}-{}", offset, offset + length - 1))
    }
}

/// 解析 JSON Lines 格式的索引响应，忽略无法解析的行
pub fn parse_index(body: &str) -> Vec<IndexRecord> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<IndexRecord>(line) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping index line: {}", e);
                None
            }
        })
        .collect()
}

/// Common Crawl 索引客户端
///
/// 查询固定快照的 CDX 索引，按记录逐条范围请求 WARC 片段并写盘。
/// 记录之间等待 `wait_time`，每个站点最多回放 `max_amount` 条。
pub struct CommonCrawlClient {
    fetcher: Arc<dyn Fetcher>,
    index_url: String,
    data_url: String,
    crawl_db: String,
    timeout: Duration,
    wait_time: Duration,
    max_amount: usize,
    accepted: HashSet<Extension>,
}

impl CommonCrawlClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &ArchiveSettings) -> Self {
        Self {
            fetcher,
            index_url: settings.index_url.trim_end_matches('/').to_string(),
            data_url: settings.data_url.trim_end_matches('/').to_string(),
            crawl_db: settings.crawl_db.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            wait_time: Duration::from_millis(settings.wait_time_ms),
            max_amount: settings.max_amount,
            accepted: settings.accepted_extensions(),
        }
    }

    /// 索引查询 URL
    pub fn index_query_url(&self, site: &str) -> String {
        format!(
            "{}/{}-index?url={}&output=json",
            self.index_url,
            self.crawl_db,
            urlencoding::encode(&format!("{}/*", site))
        )
    }

    async fn fetch_with_timeout(&self, request: FetchRequest) -> Result<Vec<u8>, ArchiveError> {
        let response = tokio::time::timeout(self.timeout, self.fetcher.fetch(&request))
            .await
            .map_err(|_| ArchiveError::Fetch(format!("timed out: {}", request.url)))?
            .map_err(|e| ArchiveError::Fetch(e.to_string()))?;
        Ok(response.body.to_vec())
    }

    /// 查询索引，返回过滤后的记录
    pub async fn lookup(&self, site: &str) -> Result<Vec<IndexRecord>, ArchiveError> {
        let body = self
            .fetch_with_timeout(FetchRequest::new(self.index_query_url(site), MAX_INDEX_BYTES))
            .await
            .map_err(|e| ArchiveError::Index(e.to_string()))?;

        let records = parse_index(&String::from_utf8_lossy(&body))
            .into_iter()
            .filter(|r| r.status.as_deref().map(|s| s == "200").unwrap_or(true))
            .filter(|r| match &r.mime {
                Some(mime) => self.accepted.contains(&Extension::from_mime(mime)),
                None => true,
            })
            .take(self.max_amount)
            .collect();
        Ok(records)
    }

    /// 下载并保存一条记录，内容不受支持时返回 `Ok(false)`
    async fn replay(&self, record: &IndexRecord, request: &ArchiveRequest) -> Result<bool, ArchiveError> {
        let fetch = FetchRequest::new(format!("{}/{}", self.data_url, record.filename), MAX_RECORD_BYTES)
            .with_header("Range", record.byte_range()?);
        let compressed = self.fetch_with_timeout(fetch).await?;
        let parsed = warc::parse_record(&warc::decompress(&compressed)?)?;

        let ext = classify(&parsed.body);
        if ext.is_none() || !self.accepted.contains(&ext) {
            debug!("Skipping {} ({})", record.url, ext);
            return Ok(false);
        }

        let uri = parsed.target_uri().unwrap_or(&record.url);
        let path = request.save_dir.join(format!("{}{}", escape(uri), ext));
        tokio::fs::write(&path, &parsed.body).await?;
        Ok(true)
    }
}

#[async_trait]
impl ArchiveIndex for CommonCrawlClient {
    async fn fetch_site(&self, request: ArchiveRequest, events: mpsc::Sender<ArchiveEvent>) {
        let site = request.site.clone();
        let records = match self.lookup(&site).await {
            Ok(records) => records,
            Err(e) => {
                let _ = events
                    .send(ArchiveEvent::Failed {
                        url: site,
                        cause: e.to_string(),
                        fatal: true,
                    })
                    .await;
                return;
            }
        };

        let total = records.len();
        let mut saved: u64 = 0;
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.wait_time).await;
            }
            match self.replay(record, &request).await {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Archive record {} failed: {}", record.url, e);
                    let _ = events
                        .send(ArchiveEvent::Failed {
                            url: record.url.clone(),
                            cause: e.to_string(),
                            fatal: false,
                        })
                        .await;
                }
            }
            let _ = events
                .send(ArchiveEvent::Progress {
                    url: site.clone(),
                    done: i + 1,
                    total,
                })
                .await;
        }

        let _ = events.send(ArchiveEvent::Finished { url: site, saved }).await;
    }

    fn name(&self) -> &'static str {
        "common_crawl"
    }
}

#[cfg(test)]
#[path = "common_crawl_test.rs"]
mod tests;
