// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 采集任务模块
///
/// 三种策略的采集任务、任务事件发送器以及策略运行器
pub mod archive_worker;
pub mod manager;
pub mod search_worker;
pub mod site_worker;
pub mod worker;

pub use worker::CrawlTask;
