// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SearchSettings;
use crate::domain::models::search_result::DiscoveryResult;
use crate::domain::search::engine::{SearchEngine, SearchError, SearchQuery};
use crate::engines::traits::{FetchRequest, Fetcher};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, info};

/// 搜索结果页的最大读取字节数
const MAX_PAGE_BYTES: u64 = 8 * 1024 * 1024;

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.g").expect("valid result selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3").expect("valid title selector"));
static SNIPPET_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.st, div.VwiC3b").expect("valid snippet selector"));

/// 按国家代码选择搜索入口，未知代码回退到 `.com`
pub fn base_url_for_country(country: &str) -> &'static str {
    match country.to_ascii_lowercase().as_str() {
        "uk" => "https://www.google.co.uk/search",
        "ru" => "https://www.google.ru/search",
        "fr" => "https://www.google.fr/search",
        _ => "https://www.google.com/search",
    }
}

/// Google 搜索引擎实现
///
/// 直接请求 HTML 结果页并解析 `div.g` 结果块。
pub struct GoogleSearchEngine {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    language: String,
    result_count: u32,
}

impl GoogleSearchEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &SearchSettings) -> Self {
        Self {
            fetcher,
            base_url: base_url_for_country(&settings.country).to_string(),
            language: settings.language.clone(),
            result_count: settings.result_count,
        }
    }

    /// 替换搜索入口（用于测试或镜像）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 构建查询 URL：`<base>?q=..&num=..&hl=..`
    pub fn query_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?q={}&num={}&hl={}",
            self.base_url,
            urlencoding::encode(&query.text()),
            self.result_count,
            urlencoding::encode(&self.language)
        )
    }
}

/// 从结果页提取搜索结果
///
/// 跳过空链接和 `#`，展开 `/url?q=` 跳转链接；排名从 1 开始。
pub fn parse_results(html: &str) -> Vec<DiscoveryResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for block in document.select(&RESULT_SELECTOR) {
        let href = match block
            .select(&LINK_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => href.trim(),
            None => continue,
        };
        if href.is_empty() || href == "#" {
            continue;
        }
        let url = unwrap_redirect(href);

        let title = block
            .select(&TITLE_SELECTOR)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let snippet = block
            .select(&SNIPPET_SELECTOR)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(DiscoveryResult::new(results.len() + 1, url, title, snippet));
    }

    results
}

fn unwrap_redirect(href: &str) -> String {
    if let Some(rest) = href.strip_prefix("/url?") {
        for pair in rest.split('&') {
            if let Some(target) = pair.strip_prefix("q=") {
                return urlencoding::decode(target)
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| target.to_string());
            }
        }
    }
    href.to_string()
}

#[async_trait]
impl SearchEngine for GoogleSearchEngine {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<DiscoveryResult>, SearchError> {
        let url = self.query_url(query);
        debug!("Google search URL: {}", url);

        let request =
            FetchRequest::new(url, MAX_PAGE_BYTES).with_header("User-Agent", &query.user_agent);
        let response = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        let html = String::from_utf8_lossy(&response.body);
        let results = parse_results(&html);
        info!("Google returned {} results for {}", results.len(), query.text());

        if results.is_empty() {
            return Err(SearchError::NoResults(query.text()));
        }
        Ok(results)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
