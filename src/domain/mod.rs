// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务概念，包括：
/// - 领域模型（models）：采集目标、采集事件、预算和搜索结果
/// - 仓库接口（repositories）：目标目录的持久化抽象接口
/// - 搜索（search）：搜索引擎抽象
/// - 存档（archive）：网页存档索引客户端抽象
///
/// 领域层不依赖于任何外部实现。
pub mod archive;
pub mod models;
pub mod repositories;
pub mod search;
