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

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status: {0}")]
    Status(u16),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 写盘失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 抓取请求
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 请求头
    pub headers: HashMap<String, String>,
    /// 响应体最大字节数，超出部分被截断
    pub max_body_bytes: u64,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, max_body_bytes: u64) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            max_body_bytes,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// 重定向后的最终URL
    pub url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// `Content-Type` 响应头
    pub content_type: Option<String>,
    /// 响应内容
    pub body: Bytes,
    /// 是否因大小上限被截断
    pub truncated: bool,
}

impl FetchResponse {
    /// 服务器是否声明为 HTML
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("html"))
    }
}

/// HTTP 抓取特质
///
/// 所有采集任务都通过它访问网络，测试中可以替换为内存实现。
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 获取页面，响应体读取至 `max_body_bytes`
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError>;

    /// 将响应体流式写入 `dest`，返回写入的字节数
    async fn download_to(&self, request: &FetchRequest, dest: &Path) -> Result<u64, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
