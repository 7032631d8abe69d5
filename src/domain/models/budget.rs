// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::content_sniffer::Extension;
use std::collections::HashSet;
use std::time::Duration;

/// 单个采集任务的资源上限
///
/// 由消费它的任务独占，不在任务之间共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    /// 最长运行时间
    pub max_duration: Duration,
    /// 累计下载字节上限
    pub max_loaded_bytes: u64,
    /// 接受的下载条目上限
    pub max_items: usize,
    /// 不受字节上限约束的扩展名（例如文档不受 HTML 页面上限约束）
    pub exempt_extensions: HashSet<Extension>,
}

impl Budget {
    /// 扩展名是否豁免字节上限
    pub fn is_exempt(&self, ext: Extension) -> bool {
        self.exempt_extensions.contains(&ext)
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(30 * 60),
            max_loaded_bytes: 2048 * 1024,
            max_items: 1000,
            exempt_extensions: [Extension::Pdf, Extension::Doc].into_iter().collect(),
        }
    }
}
