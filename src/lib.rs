// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 分层加载配置：内置默认值、配置文件与 `DOCMINER__*` 环境变量
pub mod config;

/// 领域模块
///
/// 包含采集目标、任务事件以及仓库、搜索和存档接口
pub mod domain;

/// 引擎模块
///
/// HTTP 抓取传输
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库、搜索引擎、网页存档、本地存储等
pub mod infrastructure;

/// 队列模块
///
/// 有界调度与结果聚合
pub mod queue;

/// 工具模块
///
/// 内容识别、文件名转义、URL 处理、策略日志与错误类型
pub mod utils;

/// 工作器模块
///
/// 采集任务实现与策略编排
pub mod workers;
