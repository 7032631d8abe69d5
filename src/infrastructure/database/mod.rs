// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 目录数据库
///
/// 连接建立与 `companies` 表实体
pub mod connection;
pub mod entities;
