// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 从目录中的 URL 或裸域名提取主域名
///
/// 去掉协议、端口、路径和开头的 `www.`，结果为小写。
pub fn registrable_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let host = match Url::parse(&with_scheme) {
        Ok(url) => url.host_str().unwrap_or_default().to_string(),
        Err(_) => trimmed
            .split("://")
            .last()
            .unwrap_or_default()
            .split(['/', ':', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let host = host.to_ascii_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// 允许遍历的主机集合
///
/// 主域名本身、每个别名子域（`www.`、`sso.` 等）以及回退域名。
pub fn allowed_hosts(domain: &str, aliases: &[String], fallbacks: &[String]) -> HashSet<String> {
    let mut hosts = HashSet::with_capacity(1 + aliases.len() + fallbacks.len());
    hosts.insert(domain.to_string());
    for alias in aliases {
        hosts.insert(format!("{}.{}", alias, domain));
    }
    for fallback in fallbacks {
        hosts.insert(fallback.to_ascii_lowercase());
    }
    hosts
}

/// 链接是否可以入队：仅限 http/https 且主机在允许集合内
pub fn is_allowed(url: &Url, hosts: &HashSet<String>) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url
            .host_str()
            .map(|h| hosts.contains(&h.to_ascii_lowercase()))
            .unwrap_or(false)
}

/// 访问集合使用的规范形式（去掉片段）
pub fn normalize(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// URL 路径的最后一段，解码失败时保留原文
pub fn last_segment(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
