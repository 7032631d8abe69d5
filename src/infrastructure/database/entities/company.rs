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

use crate::domain::models::target::{Strategy, Target};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub url: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub industry_group: Option<String>,
    pub business: Option<String>,
    pub economics: Option<String>,
    pub is_colly_crawled: bool,
    pub is_google_crawled: bool,
    pub is_common_crawled: bool,
    pub num_docs: i32,
    pub num_html: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// 策略对应的完成标志列
pub fn done_column(strategy: Strategy) -> Column {
    match strategy {
        Strategy::Traversal => Column::IsCollyCrawled,
        Strategy::Search => Column::IsGoogleCrawled,
        Strategy::Archive => Column::IsCommonCrawled,
    }
}

impl From<Model> for Target {
    fn from(m: Model) -> Self {
        Target {
            id: m.id,
            url: m.url,
            name: m.name,
            industry: m.industry,
            industry_group: m.industry_group,
            traversal_done: m.is_colly_crawled,
            search_done: m.is_google_crawled,
            archive_done: m.is_common_crawled,
        }
    }
}
