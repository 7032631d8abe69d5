// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供目标仓库接口的关系型与内存实现
pub mod memory_target_repo;
pub mod target_repo_impl;
