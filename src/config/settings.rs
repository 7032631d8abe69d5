// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::budget::Budget;
use crate::domain::models::target::Strategy;
use crate::utils::content_sniffer::Extension;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use validator::{Validate, ValidationError};

/// 应用程序配置设置
///
/// 包含数据库、HTTP、指标以及三种采集策略的配置项
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// 数据库配置
    #[validate(nested)]
    pub database: DatabaseSettings,
    /// HTTP 传输配置
    #[validate(nested)]
    pub http: HttpSettings,
    /// 指标导出配置
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// 站点遍历配置
    #[validate(nested)]
    pub traversal: TraversalSettings,
    /// 搜索发现配置
    #[validate(nested)]
    pub search: SearchSettings,
    /// 存档回放配置
    #[validate(nested)]
    pub archive: ArchiveSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    #[validate(length(min = 1))]
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// HTTP 传输配置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HttpSettings {
    /// 建立连接超时（秒）
    #[validate(range(min = 1))]
    pub connect_timeout_secs: u64,
    /// 等待响应头超时（秒）
    #[validate(range(min = 1))]
    pub read_timeout_secs: u64,
    /// 整个请求超时（秒）
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    /// 是否接受无效证书
    pub accept_invalid_certs: bool,
}

/// 指标导出配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 监听地址，例如 `0.0.0.0:9000`；为空则不导出
    pub listen: Option<String>,
}

/// 站点遍历配置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TraversalSettings {
    pub enabled: bool,
    /// 输出根目录
    #[validate(length(min = 1))]
    pub path: String,
    pub debug: bool,
    /// 并发上限
    #[validate(range(min = 1))]
    pub workers: usize,
    /// 两次启动之间的最小间隔（秒）
    pub interval_secs: u64,
    /// 单个站点的时间预算（分钟）
    #[validate(range(min = 1))]
    pub work_minutes: u64,
    /// 单个响应体上限（MB）
    #[validate(range(min = 1))]
    pub max_file_size_mb: u64,
    /// 累计下载量超过该值（KB）后只保留豁免扩展名
    pub max_html_load_kb: u64,
    /// 单个站点最多保存的文件数
    #[validate(range(min = 1))]
    pub max_amount: usize,
    /// 不受大小预算限制的扩展名
    #[validate(custom(function = "validate_extensions"))]
    pub extensions: Vec<String>,
    /// 文件名是否追加随机后缀
    pub random_name: bool,
    /// 允许的子域别名
    pub subdomain_aliases: Vec<String>,
    /// 允许的回退域名（对象存储等）
    pub fallback_domains: Vec<String>,
    /// User-Agent 池，每个请求随机取一个
    #[validate(length(min = 1))]
    pub user_agents: Vec<String>,
}

/// 搜索发现配置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchSettings {
    pub enabled: bool,
    #[validate(length(min = 1))]
    pub path: String,
    pub debug: bool,
    #[validate(range(min = 1))]
    pub workers: usize,
    pub interval_secs: u64,
    /// `filetype:` 过滤使用的扩展名（不带点）
    #[validate(length(min = 1))]
    pub extension: String,
    #[validate(range(min = 1))]
    pub max_file_size_mb: u64,
    /// 搜索引擎国家代码：com、uk、ru、fr
    pub country: String,
    /// 界面语言（`hl` 参数）
    pub language: String,
    #[validate(range(min = 1, max = 100))]
    pub result_count: u32,
    /// User-Agent 池
    #[validate(length(min = 1))]
    pub user_agents: Vec<String>,
}

/// 存档回放配置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArchiveSettings {
    pub enabled: bool,
    #[validate(length(min = 1))]
    pub path: String,
    pub debug: bool,
    #[validate(range(min = 1))]
    pub workers: usize,
    pub interval_secs: u64,
    /// 抓取快照名称，例如 `CC-MAIN-2019-22`
    #[validate(length(min = 1))]
    pub crawl_db: String,
    /// 索引与数据请求超时（秒）
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
    /// 两条记录之间的等待（毫秒）
    pub wait_time_ms: u64,
    /// 单个站点最多回放的记录数
    #[validate(range(min = 1))]
    pub max_amount: usize,
    /// 接受的内容扩展名
    #[validate(custom(function = "validate_extensions"))]
    pub extensions: Vec<String>,
    #[validate(url)]
    pub index_url: String,
    #[validate(url)]
    pub data_url: String,
}

/// 一个策略运行所需的公共参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub strategy: Strategy,
    pub enabled: bool,
    pub path: PathBuf,
    pub workers: usize,
    pub interval: Duration,
}

fn validate_extensions(extensions: &[String]) -> Result<(), ValidationError> {
    for ext in extensions {
        if ext.parse::<Extension>().is_err() {
            let mut error = ValidationError::new("unsupported_extension");
            error.message = Some(format!("unsupported extension: {}", ext).into());
            return Err(error);
        }
    }
    Ok(())
}

fn parse_extensions(extensions: &[String]) -> HashSet<Extension> {
    extensions
        .iter()
        .filter_map(|e| e.parse::<Extension>().ok())
        .filter(|e| !e.is_none())
        .collect()
}

impl TraversalSettings {
    pub fn run(&self) -> RunSettings {
        RunSettings {
            strategy: Strategy::Traversal,
            enabled: self.enabled,
            path: PathBuf::from(&self.path),
            workers: self.workers,
            interval: Duration::from_secs(self.interval_secs),
        }
    }

    /// 每个遍历任务独享的预算
    pub fn budget(&self) -> Budget {
        Budget {
            max_duration: Duration::from_secs(self.work_minutes * 60),
            max_loaded_bytes: self.max_html_load_kb * 1024,
            max_items: self.max_amount,
            exempt_extensions: parse_extensions(&self.extensions),
        }
    }

    /// 单个响应体上限（字节）
    pub fn max_body_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl SearchSettings {
    pub fn run(&self) -> RunSettings {
        RunSettings {
            strategy: Strategy::Search,
            enabled: self.enabled,
            path: PathBuf::from(&self.path),
            workers: self.workers,
            interval: Duration::from_secs(self.interval_secs),
        }
    }

    pub fn max_body_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl ArchiveSettings {
    pub fn run(&self) -> RunSettings {
        RunSettings {
            strategy: Strategy::Archive,
            enabled: self.enabled,
            path: PathBuf::from(&self.path),
            workers: self.workers,
            interval: Duration::from_secs(self.interval_secs),
        }
    }

    pub fn accepted_extensions(&self) -> HashSet<Extension> {
        parse_extensions(&self.extensions)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/<APP_ENVIRONMENT>`、
    /// 工作目录下的 `config.toml` 和 `DOCMINER__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("DOCMINER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("traversal.extensions")
                    .with_list_parse_key("traversal.subdomain_aliases")
                    .with_list_parse_key("traversal.fallback_domains")
                    .with_list_parse_key("traversal.user_agents")
                    .with_list_parse_key("search.user_agents")
                    .with_list_parse_key("archive.extensions")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 从单个 TOML 字符串加载，未给出的键使用内置默认值
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Database
            .set_default("database.url", "sqlite://docminer.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // HTTP transport
            .set_default("http.connect_timeout_secs", 180)?
            .set_default("http.read_timeout_secs", 60)?
            .set_default("http.request_timeout_secs", 300)?
            .set_default("http.accept_invalid_certs", true)?
            // Site traversal
            .set_default("traversal.enabled", true)?
            .set_default("traversal.path", "./data/traversal")?
            .set_default("traversal.debug", false)?
            .set_default("traversal.workers", 10)?
            .set_default("traversal.interval_secs", 1)?
            .set_default("traversal.work_minutes", 30)?
            .set_default("traversal.max_file_size_mb", 50)?
            .set_default("traversal.max_html_load_kb", 2048)?
            .set_default("traversal.max_amount", 1000)?
            .set_default("traversal.extensions", vec![".pdf", ".doc"])?
            .set_default("traversal.random_name", false)?
            .set_default("traversal.subdomain_aliases", vec!["www", "sso"])?
            .set_default("traversal.fallback_domains", vec!["s3.amazonaws.com"])?
            .set_default("traversal.user_agents", DEFAULT_USER_AGENTS.to_vec())?
            // Search discovery
            .set_default("search.enabled", true)?
            .set_default("search.path", "./data/search")?
            .set_default("search.debug", false)?
            .set_default("search.workers", 2)?
            .set_default("search.interval_secs", 30)?
            .set_default("search.extension", "pdf")?
            .set_default("search.max_file_size_mb", 50)?
            .set_default("search.country", "ru")?
            .set_default("search.language", "ru")?
            .set_default("search.result_count", 100)?
            .set_default("search.user_agents", DEFAULT_USER_AGENTS.to_vec())?
            // Archive replay
            .set_default("archive.enabled", true)?
            .set_default("archive.path", "./data/archive")?
            .set_default("archive.debug", false)?
            .set_default("archive.workers", 5)?
            .set_default("archive.interval_secs", 1)?
            .set_default("archive.crawl_db", "CC-MAIN-2019-22")?
            .set_default("archive.timeout_secs", 30)?
            .set_default("archive.wait_time_ms", 1000)?
            .set_default("archive.max_amount", 100)?
            .set_default("archive.extensions", vec![".pdf", ".doc", ".txt", ".html"])?
            .set_default("archive.index_url", "http://index.commoncrawl.org")?
            .set_default("archive.data_url", "https://commoncrawl.s3.amazonaws.com")
    }

    /// 按策略取公共运行参数
    pub fn run(&self, strategy: Strategy) -> RunSettings {
        match strategy {
            Strategy::Traversal => self.traversal.run(),
            Strategy::Search => self.search.run(),
            Strategy::Archive => self.archive.run(),
        }
    }

    /// 是否有策略开启了调试日志
    pub fn debug(&self) -> bool {
        self.traversal.debug || self.search.debug || self.archive.debug
    }
}

/// 默认 User-Agent 池
pub const DEFAULT_USER_AGENTS: [&str; 6] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:67.0) Gecko/20100101 Firefox/67.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.157 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.14; rv:67.0) Gecko/20100101 Firefox/67.0",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36",
];

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
