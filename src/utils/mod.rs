// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括内容嗅探、文件名转义、URL 处理、策略日志和遥测
pub mod content_sniffer;
pub mod errors;
pub mod name_escaper;
pub mod strategy_log;
pub mod telemetry;
pub mod url_utils;
