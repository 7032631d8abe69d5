// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::target_repository::RepositoryError;
use thiserror::Error;

/// 输出存储错误
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("无效路径: {0}")]
    InvalidPath(String),
}

/// 策略运行错误
///
/// 任何一种都会中止整个策略；单个目标的失败不会走到这里。
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("仓库错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("调度错误: {0}")]
    Dispatch(String),

    #[error("任务异常退出: {0}")]
    Join(#[from] tokio::task::JoinError),
}
