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
        // Thomson Reuters Business Classification levels share one layout
        for table in [
            Taxonomy::Industries,
            Taxonomy::IndustryGroups,
            Taxonomy::Businesses,
            Taxonomy::Economics,
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Taxonomy::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Taxonomy::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Taxonomy::NumUrl).integer().not_null().default(0))
                        .col(ColumnDef::new(Taxonomy::NumHtml).integer().not_null().default(0))
                        .col(ColumnDef::new(Taxonomy::NumDocs).integer().not_null().default(0))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Taxonomy::Economics,
            Taxonomy::Businesses,
            Taxonomy::IndustryGroups,
            Taxonomy::Industries,
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Taxonomy {
    Industries,
    IndustryGroups,
    Businesses,
    Economics,
    Id,
    Name,
    NumUrl,
    NumHtml,
    NumDocs,
}
