// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::TraversalSettings;
use crate::domain::models::budget::Budget;
use crate::domain::models::target::Strategy;
use crate::engines::traits::{FetchRequest, Fetcher};
use crate::infrastructure::storage::{random_letters, LocalStorage, SHORT_SUFFIX_LEN};
use crate::utils::content_sniffer::{classify, Extension};
use crate::utils::name_escaper::escape;
use crate::utils::url_utils::{allowed_hosts, is_allowed, normalize, resolve_url};
use crate::workers::worker::{CrawlTask, EventEmitter, TaskContext};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use url::Url;

/// 一次遍历至少要拿到的字节数，否则尝试下一个域名变体
pub const MIN_YIELD_BYTES: u64 = 25 * 1024;

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));

/// 遍历状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    Running,
    /// 超出时间预算
    TimedOut,
    /// 达到条目上限
    Exhausted,
    /// 链接耗尽或域名变体全部尝试完毕
    Completed,
}

/// 域名变体，按尝试顺序排列
pub fn domain_ladder(domain: &str) -> [String; 4] {
    [
        format!("https://{}", domain),
        format!("https://www.{}", domain),
        format!("http://{}", domain),
        format!("http://www.{}", domain),
    ]
}

/// 从 HTML 中提取所有链接的原始 `href`
fn extract_links(body: &[u8]) -> Vec<String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);
    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// 保存文件使用的主名：转义后的路径，根路径为 `index`
fn file_stem(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() || path == "/" {
        "index".to_string()
    } else {
        escape(path)
    }
}

/// 站点遍历任务
///
/// 从 `https://<domain>` 开始广度优先跟随站内链接，受 [`Budget`] 约束；
/// 收获不足 25 KiB 时依次尝试 `www.`、`http://` 变体。
pub struct SiteTraversalTask {
    fetcher: Arc<dyn Fetcher>,
    storage: LocalStorage,
    budget: Budget,
    max_body_bytes: u64,
    random_name: bool,
    subdomain_aliases: Vec<String>,
    fallback_domains: Vec<String>,
    user_agents: Vec<String>,
}

impl SiteTraversalTask {
    pub fn new(fetcher: Arc<dyn Fetcher>, storage: LocalStorage, settings: &TraversalSettings) -> Self {
        Self {
            fetcher,
            storage,
            budget: settings.budget(),
            max_body_bytes: settings.max_body_bytes(),
            random_name: settings.random_name,
            subdomain_aliases: settings.subdomain_aliases.clone(),
            fallback_domains: settings.fallback_domains.clone(),
            user_agents: settings.user_agents.clone(),
        }
    }

    /// 替换预算
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }
}

/// 单个目标一次运行的可变状态
struct Traversal<'a> {
    task: &'a SiteTraversalTask,
    ctx: &'a mut TaskContext,
    events: &'a EventEmitter,
    hosts: HashSet<String>,
    visited: HashSet<String>,
    started: Instant,
    deadline: Instant,
    loaded: u64,
    items: usize,
    state: TraversalState,
}

/// 一个域名变体的遍历结果
enum RootOutcome {
    /// 根页面请求失败
    Unreachable,
    /// 根页面已在之前的变体中访问过
    AlreadyVisited,
    Reached,
}

impl<'a> Traversal<'a> {
    fn over_budget(&mut self) -> bool {
        if self.started.elapsed() > self.task.budget.max_duration {
            self.state = TraversalState::TimedOut;
        } else if self.items >= self.task.budget.max_items {
            self.state = TraversalState::Exhausted;
        }
        self.state != TraversalState::Running
    }

    async fn crawl_root(&mut self, root: &str) -> RootOutcome {
        let root = match Url::parse(root) {
            Ok(url) => url,
            Err(e) => {
                self.events.warning(format!("{}: {}", root, e));
                return RootOutcome::Unreachable;
            }
        };
        if !self.visited.insert(normalize(&root)) {
            return RootOutcome::AlreadyVisited;
        }

        let mut queue = VecDeque::from([root]);
        let mut outcome = None;

        while let Some(url) = queue.pop_front() {
            let mut request = FetchRequest::new(url.as_str(), self.task.max_body_bytes);
            if let Some(agent) = self.task.user_agents.choose(&mut self.ctx.rng) {
                request = request.with_header("User-Agent", agent.as_str());
            }
            let fetched =
                tokio::time::timeout_at(self.deadline, self.task.fetcher.fetch(&request)).await;

            let response = match fetched {
                Err(_) => {
                    self.state = TraversalState::TimedOut;
                    break;
                }
                Ok(Err(e)) => {
                    self.events.warning(format!("{}: {}", url, e));
                    outcome.get_or_insert(RootOutcome::Unreachable);
                    continue;
                }
                Ok(Ok(response)) => response,
            };
            outcome.get_or_insert(RootOutcome::Reached);

            if self.over_budget() {
                break;
            }

            let page_url = Url::parse(&response.url).unwrap_or(url);
            let ext = classify(&response.body);
            if ext == Extension::Html || response.is_html() {
                for href in extract_links(&response.body) {
                    let Ok(link) = resolve_url(&page_url, &href) else {
                        continue;
                    };
                    if is_allowed(&link, &self.hosts) && self.visited.insert(normalize(&link)) {
                        queue.push_back(link);
                    }
                }
            }

            if response.truncated && !ext.is_none() {
                self.events.warning(format!(
                    "{}: truncated at {} bytes",
                    page_url, self.task.max_body_bytes
                ));
            }
            self.persist(&page_url, ext, &response.body).await;
        }

        outcome.unwrap_or(RootOutcome::Unreachable)
    }

    async fn persist(&mut self, url: &Url, ext: Extension, body: &[u8]) {
        if ext.is_none() {
            debug!("Discarding unclassified content from {}", url);
            return;
        }
        if self.loaded > self.task.budget.max_loaded_bytes && !self.task.budget.is_exempt(ext) {
            debug!("Size budget spent, discarding {} from {}", ext, url);
            return;
        }

        let suffix = if self.task.random_name {
            random_letters(&mut self.ctx.rng, SHORT_SUFFIX_LEN)
        } else {
            String::new()
        };
        let name = format!("{}{}{}", file_stem(url), suffix, ext);

        match self.task.storage.save(&self.ctx.output_dir, &name, body).await {
            Ok(path) => {
                self.loaded += body.len() as u64;
                self.items += 1;
                debug!("Saved {} to {}", url, path.display());
                self.events.progress(self.items, self.task.budget.max_items);
            }
            Err(e) => self.events.warning(format!("{}: {}", url, e)),
        }
    }
}

#[async_trait]
impl CrawlTask for SiteTraversalTask {
    fn strategy(&self) -> Strategy {
        Strategy::Traversal
    }

    #[instrument(skip_all, fields(target = %ctx.target.url))]
    async fn run(&self, mut ctx: TaskContext, events: EventEmitter) {
        let domain = ctx.target.domain();
        let started = Instant::now();
        let mut traversal = Traversal {
            task: self,
            hosts: allowed_hosts(&domain, &self.subdomain_aliases, &self.fallback_domains),
            ctx: &mut ctx,
            events: &events,
            visited: HashSet::new(),
            started,
            deadline: started + self.budget.max_duration,
            loaded: 0,
            items: 0,
            state: TraversalState::Running,
        };

        let mut any_reached = false;
        for root in domain_ladder(&domain) {
            match traversal.crawl_root(&root).await {
                RootOutcome::Unreachable => {}
                RootOutcome::AlreadyVisited | RootOutcome::Reached => any_reached = true,
            }
            if traversal.state != TraversalState::Running || traversal.loaded >= MIN_YIELD_BYTES {
                break;
            }
            debug!("{} yielded {} bytes, trying next variant", root, traversal.loaded);
        }

        if traversal.state == TraversalState::Running {
            traversal.state = TraversalState::Completed;
        }
        let (state, loaded, items) = (traversal.state, traversal.loaded, traversal.items);
        info!("{} finished in state {:?}: {} files, {} bytes", domain, state, items, loaded);

        if state == TraversalState::Completed && !any_reached && loaded == 0 {
            events.error(format!("{} unreachable on every domain variant", domain));
        } else {
            events.done(loaded);
        }
    }
}

#[cfg(test)]
#[path = "site_worker_test.rs"]
mod tests;
