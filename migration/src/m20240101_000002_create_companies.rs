// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Url).string().not_null().unique_key())
                    .col(ColumnDef::new(Companies::Name).string())
                    .col(ColumnDef::new(Companies::Industry).string())
                    .col(ColumnDef::new(Companies::IndustryGroup).string())
                    .col(ColumnDef::new(Companies::Business).string())
                    .col(ColumnDef::new(Companies::Economics).string())
                    .col(
                        ColumnDef::new(Companies::IsCollyCrawled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Companies::IsGoogleCrawled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Companies::IsCommonCrawled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Companies::NumDocs).integer().not_null().default(0))
                    .col(ColumnDef::new(Companies::NumHtml).integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        // Pending queries filter on one flag per strategy
        for (name, column) in [
            ("idx_companies_colly", Companies::IsCollyCrawled),
            ("idx_companies_google", Companies::IsGoogleCrawled),
            ("idx_companies_common", Companies::IsCommonCrawled),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Companies::Table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Companies {
    Table,
    Id,
    Url,
    Name,
    Industry,
    IndustryGroup,
    Business,
    Economics,
    IsCollyCrawled,
    IsGoogleCrawled,
    IsCommonCrawled,
    NumDocs,
    NumHtml,
}
