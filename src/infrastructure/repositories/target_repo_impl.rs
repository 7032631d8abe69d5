// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::target::{CatalogStats, NewTarget, Strategy, Target};
use crate::domain::repositories::target_repository::{RepositoryError, TargetRepository};
use crate::infrastructure::database::entities::company as company_entity;
use async_trait::async_trait;
use sea_orm::{sea_query::Expr, *};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// 目标仓库实现（关系型存储）
///
/// 每次 `mark_done` 是一条独立的 UPDATE，不开启事务；
/// 并发写由数据库自身串行化。
pub struct TargetRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TargetRepositoryImpl {
    /// 创建新的目标仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 播种一个新目标，URL 重复时返回 `AlreadyExists`
    pub async fn insert(&self, target: NewTarget) -> Result<Target, RepositoryError> {
        let model = company_entity::ActiveModel {
            url: Set(target.url.clone()),
            name: Set(target.name),
            industry: Set(target.industry),
            industry_group: Set(target.industry_group),
            business: Set(None),
            economics: Set(None),
            is_colly_crawled: Set(false),
            is_google_crawled: Set(false),
            is_common_crawled: Set(false),
            num_docs: Set(0),
            num_html: Set(0),
            ..Default::default()
        };

        match model.insert(self.db.as_ref()).await {
            Ok(m) => Ok(m.into()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(RepositoryError::AlreadyExists(target.url))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TargetRepository for TargetRepositoryImpl {
    async fn pending(&self, strategy: Strategy) -> Result<Vec<Target>, RepositoryError> {
        let models = company_entity::Entity::find()
            .filter(company_entity::done_column(strategy).eq(false))
            .order_by_asc(company_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Target::from).collect())
    }

    async fn mark_done(&self, strategy: Strategy, url: &str) -> Result<(), RepositoryError> {
        let result = company_entity::Entity::update_many()
            .col_expr(company_entity::done_column(strategy), Expr::value(true))
            .filter(company_entity::Column::Url.eq(url))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            debug!("mark_done({}) matched no target for {}", strategy, url);
        }
        Ok(())
    }

    async fn industry_folders(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(Option<String>, Option<String>)> = company_entity::Entity::find()
            .select_only()
            .column(company_entity::Column::IndustryGroup)
            .column(company_entity::Column::Industry)
            .distinct()
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        let folders: BTreeSet<String> = rows
            .into_iter()
            .filter_map(|(group, industry)| {
                group
                    .filter(|g| !g.is_empty())
                    .or_else(|| industry.filter(|i| !i.is_empty()))
            })
            .collect();

        Ok(folders.into_iter().collect())
    }

    async fn stats(&self) -> Result<CatalogStats, RepositoryError> {
        let db = self.db.as_ref();
        let total = company_entity::Entity::find().count(db).await?;

        let mut stats = CatalogStats {
            total,
            ..Default::default()
        };
        for strategy in Strategy::ALL {
            let pending = company_entity::Entity::find()
                .filter(company_entity::done_column(strategy).eq(false))
                .count(db)
                .await?;
            match strategy {
                Strategy::Traversal => stats.pending_traversal = pending,
                Strategy::Search => stats.pending_search = pending,
                Strategy::Archive => stats.pending_archive = pending,
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
#[path = "target_repo_impl_test.rs"]
mod tests;
