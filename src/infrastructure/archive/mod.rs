// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 存档模块
///
/// Common Crawl 索引客户端与 WARC 记录解析
pub mod common_crawl;
pub mod warc;
