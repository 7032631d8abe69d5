// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 存档（archive）：Common Crawl 索引客户端和 WARC 记录解析
/// - 数据库（database）：提供数据库连接和实体映射
/// - 指标（metrics）：Prometheus 指标导出
/// - 仓库实现（repositories）：目标仓库接口的具体实现
/// - 搜索（search）：搜索引擎实现
/// - 存储（storage）：目标输出目录和文件写入
///
/// 基础设施层依赖于领域层的抽象接口，领域层不依赖具体技术实现。
pub mod archive;
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod search;
pub mod storage;
