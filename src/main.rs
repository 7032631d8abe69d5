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

use docminer::config::settings::Settings;
use docminer::domain::models::target::Strategy;
use docminer::domain::repositories::target_repository::TargetRepository;
use docminer::engines::reqwest_engine::ReqwestEngine;
use docminer::engines::traits::Fetcher;
use docminer::infrastructure::archive::common_crawl::CommonCrawlClient;
use docminer::infrastructure::database::connection;
use docminer::infrastructure::metrics;
use docminer::infrastructure::repositories::target_repo_impl::TargetRepositoryImpl;
use docminer::infrastructure::search::google::GoogleSearchEngine;
use docminer::infrastructure::storage::LocalStorage;
use docminer::utils::telemetry;
use docminer::workers::archive_worker::ArchiveReplayTask;
use docminer::workers::manager::{Orchestrator, StrategyRunner};
use docminer::workers::search_worker::SearchDiscoveryTask;
use docminer::workers::site_worker::SiteTraversalTask;
use docminer::workers::CrawlTask;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// 主函数
///
/// 加载配置，连接目录数据库，然后并行运行所有启用的采集策略
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;
    telemetry::init_telemetry(settings.debug());
    settings.validate()?;
    info!("Configuration loaded");

    if let Some(listen) = &settings.metrics.listen {
        metrics::init_metrics(listen);
    }

    // 2. Connect to the catalog
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    Migrator::up(db.as_ref(), None).await?;
    info!("Catalog database ready");

    let repository: Arc<dyn TargetRepository> = Arc::new(TargetRepositoryImpl::new(db.clone()));
    let stats = repository.stats().await?;
    info!("Catalog holds {} targets", stats.total);
    for strategy in Strategy::ALL {
        info!("  {:<16} {} pending", strategy.label(), stats.pending(strategy));
    }

    // 3. Build transports and tasks
    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestEngine::new(&settings.http)?);

    let mut orchestrator = Orchestrator::new();
    for strategy in Strategy::ALL {
        let run = settings.run(strategy);
        if !run.enabled {
            info!("[{}] Disabled", strategy.label());
            continue;
        }
        let task: Arc<dyn CrawlTask> = match strategy {
            Strategy::Archive => Arc::new(ArchiveReplayTask::new(Arc::new(CommonCrawlClient::new(
                fetcher.clone(),
                &settings.archive,
            )))),
            Strategy::Search => Arc::new(SearchDiscoveryTask::new(
                Arc::new(GoogleSearchEngine::new(fetcher.clone(), &settings.search)),
                fetcher.clone(),
                LocalStorage::new(run.path.clone()),
                &settings.search,
            )),
            Strategy::Traversal => Arc::new(SiteTraversalTask::new(
                fetcher.clone(),
                LocalStorage::new(run.path.clone()),
                &settings.traversal,
            )),
        };
        orchestrator.add(StrategyRunner::new(&run, repository.clone(), task));
    }

    if orchestrator.is_empty() {
        warn!("No strategy enabled, nothing to do");
        return Ok(());
    }

    // 4. Run until every strategy finishes
    let mut failed = Vec::new();
    for (strategy, result) in orchestrator.run().await {
        if let Err(e) = result {
            failed.push(format!("{}: {}", strategy, e));
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("strategies aborted: {}", failed.join("; "));
    }

    info!("All strategies finished");
    Ok(())
}
