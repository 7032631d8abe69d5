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

use crate::config::settings::HttpSettings;
use crate::engines::traits::{EngineError, FetchRequest, FetchResponse, Fetcher};
use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; docminer/0.1)";

/// 抓取引擎
///
/// 基于reqwest实现的HTTP引擎。目标站点证书经常配置错误，
/// 因此默认不校验证书；连接不复用。
pub struct ReqwestEngine {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl ReqwestEngine {
    /// 按 HTTP 配置创建引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 连接、响应头和整体请求超时，以及证书策略
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 引擎实例
    /// * `Err(EngineError)` - 客户端构建失败
    pub fn new(settings: &HttpSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            read_timeout: Duration::from_secs(settings.read_timeout_secs),
        })
    }

    /// 发送请求并等待响应头
    async fn send(&self, request: &FetchRequest) -> Result<reqwest::Response, EngineError> {
        let mut headers = HeaderMap::new();
        for (k, v) in &request.headers {
            if let (Ok(k), Ok(v)) = (
                HeaderName::from_bytes(k.as_bytes()),
                HeaderValue::from_str(v),
            ) {
                headers.insert(k, v);
            }
        }

        let pending = self.client.get(&request.url).headers(headers).send();
        let response = tokio::time::timeout(self.read_timeout, pending)
            .await
            .map_err(|_| EngineError::Timeout)??;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for ReqwestEngine {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        let mut response = self.send(request).await?;
        let status_code = response.status().as_u16();
        let url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let limit = request.max_body_bytes as usize;
        let mut body = BytesMut::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await? {
            let room = limit.saturating_sub(body.len());
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchResponse {
            url,
            status_code,
            content_type,
            body: body.freeze(),
            truncated,
        })
    }

    async fn download_to(&self, request: &FetchRequest, dest: &Path) -> Result<u64, EngineError> {
        let mut response = self.send(request).await?;
        let mut file = tokio::fs::File::create(dest).await?;

        let limit = request.max_body_bytes;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            let room = (limit - written) as usize;
            let take = chunk.len().min(room);
            file.write_all(&chunk[..take]).await?;
            written += take as u64;
            if written >= limit {
                break;
            }
        }
        file.flush().await?;

        Ok(written)
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
