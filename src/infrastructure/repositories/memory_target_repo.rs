// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::target::{CatalogStats, NewTarget, Strategy, Target};
use crate::domain::repositories::target_repository::{RepositoryError, TargetRepository};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeSet;

/// 内存目标仓库
///
/// 读操作并发执行，写操作持有写锁；用于测试和一次性运行。
#[derive(Default)]
pub struct InMemoryTargetRepository {
    targets: RwLock<Vec<Target>>,
}

impl InMemoryTargetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 播种一个新目标，URL 重复时返回 `AlreadyExists`
    pub fn insert(&self, target: NewTarget) -> Result<Target, RepositoryError> {
        let mut targets = self.targets.write();
        if targets.iter().any(|t| t.url == target.url) {
            return Err(RepositoryError::AlreadyExists(target.url));
        }

        let id = targets.last().map(|t| t.id + 1).unwrap_or(1);
        let target = Target {
            id,
            url: target.url,
            name: target.name,
            industry: target.industry,
            industry_group: target.industry_group,
            traversal_done: false,
            search_done: false,
            archive_done: false,
        };
        targets.push(target.clone());
        Ok(target)
    }

    /// 按 URL 查找目标（测试用）
    pub fn get(&self, url: &str) -> Option<Target> {
        self.targets.read().iter().find(|t| t.url == url).cloned()
    }
}

#[async_trait]
impl TargetRepository for InMemoryTargetRepository {
    async fn pending(&self, strategy: Strategy) -> Result<Vec<Target>, RepositoryError> {
        Ok(self
            .targets
            .read()
            .iter()
            .filter(|t| !t.is_done(strategy))
            .cloned()
            .collect())
    }

    async fn mark_done(&self, strategy: Strategy, url: &str) -> Result<(), RepositoryError> {
        if let Some(target) = self.targets.write().iter_mut().find(|t| t.url == url) {
            target.set_done(strategy);
        }
        Ok(())
    }

    async fn industry_folders(&self) -> Result<Vec<String>, RepositoryError> {
        let folders: BTreeSet<String> = self
            .targets
            .read()
            .iter()
            .filter_map(|t| t.folder().map(str::to_string))
            .collect();
        Ok(folders.into_iter().collect())
    }

    async fn stats(&self) -> Result<CatalogStats, RepositoryError> {
        let targets = self.targets.read();
        let pending = |s: Strategy| targets.iter().filter(|t| !t.is_done(s)).count() as u64;
        Ok(CatalogStats {
            total: targets.len() as u64,
            pending_traversal: pending(Strategy::Traversal),
            pending_search: pending(Strategy::Search),
            pending_archive: pending(Strategy::Archive),
        })
    }
}
