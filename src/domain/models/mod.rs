// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义采集目标、采集事件、资源预算和搜索结果等核心数据结构
pub mod budget;
pub mod crawl_event;
pub mod search_result;
pub mod target;
