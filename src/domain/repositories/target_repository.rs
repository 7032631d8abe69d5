// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::target::{CatalogStats, Strategy, Target};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
///
/// 存储不可用对整个策略是致命的，仓库内部不做部分重试。
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录已存在
    #[error("Target already exists: {0}")]
    AlreadyExists(String),
    /// 存储不可用
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// 目标仓库特质（任务源）
///
/// 持久化的目标目录。按策略提供“未完成”查询与“标记完成”操作，
/// 是调度时读取、完成时写入的唯一事实来源。
#[async_trait]
pub trait TargetRepository: Send + Sync {
    /// 返回该策略下所有未完成的目标，按 id 排序，为调用时刻的快照
    async fn pending(&self, strategy: Strategy) -> Result<Vec<Target>, RepositoryError>;

    /// 将目标在该策略下标记为完成
    ///
    /// 幂等；可被多个聚合器并发调用。
    async fn mark_done(&self, strategy: Strategy, url: &str) -> Result<(), RepositoryError>;

    /// 所有目标使用的输出分类目录（去重）
    async fn industry_folders(&self) -> Result<Vec<String>, RepositoryError>;

    /// 目录概况
    async fn stats(&self) -> Result<CatalogStats, RepositoryError>;
}
