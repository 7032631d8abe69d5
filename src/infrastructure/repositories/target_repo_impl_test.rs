// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

async fn setup_repo() -> TargetRepositoryImpl {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    TargetRepositoryImpl::new(Arc::new(db))
}

#[tokio::test]
async fn test_pending_is_ordered_and_filtered_per_strategy() {
    let repo = setup_repo().await;
    repo.insert(NewTarget::new("kai.ru").with_industry("Education"))
        .await
        .unwrap();
    repo.insert(NewTarget::new("https://www.kaspersky.ru/"))
        .await
        .unwrap();

    repo.mark_done(Strategy::Search, "kai.ru").await.unwrap();

    let traversal = repo.pending(Strategy::Traversal).await.unwrap();
    assert_eq!(traversal.len(), 2);
    assert_eq!(traversal[0].url, "kai.ru");
    assert!(traversal[0].id < traversal[1].id);

    let search = repo.pending(Strategy::Search).await.unwrap();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].url, "https://www.kaspersky.ru/");
}

#[tokio::test]
async fn test_mark_done_is_idempotent() {
    let repo = setup_repo().await;
    repo.insert(NewTarget::new("kai.ru")).await.unwrap();

    repo.mark_done(Strategy::Archive, "kai.ru").await.unwrap();
    repo.mark_done(Strategy::Archive, "kai.ru").await.unwrap();
    repo.mark_done(Strategy::Archive, "unknown.ru").await.unwrap();

    assert!(repo.pending(Strategy::Archive).await.unwrap().is_empty());
    assert_eq!(repo.pending(Strategy::Traversal).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_url_is_rejected() {
    let repo = setup_repo().await;
    repo.insert(NewTarget::new("kai.ru")).await.unwrap();

    let result = repo.insert(NewTarget::new("kai.ru")).await;
    assert!(matches!(result, Err(RepositoryError::AlreadyExists(url)) if url == "kai.ru"));
}

#[tokio::test]
async fn test_industry_folders_and_stats() {
    let repo = setup_repo().await;
    repo.insert(NewTarget::new("a.ru").with_industry("Energy"))
        .await
        .unwrap();
    repo.insert(
        NewTarget::new("b.ru")
            .with_industry("Energy")
            .with_industry_group("Oil & Gas"),
    )
    .await
    .unwrap();
    repo.insert(NewTarget::new("c.ru")).await.unwrap();
    repo.mark_done(Strategy::Traversal, "c.ru").await.unwrap();

    let folders = repo.industry_folders().await.unwrap();
    assert_eq!(folders, vec!["Energy".to_string(), "Oil & Gas".to_string()]);

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending(Strategy::Traversal), 2);
    assert_eq!(stats.pending(Strategy::Search), 3);
}
