//! Create campaign table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaign::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Campaign::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(Campaign::TenantId).string_len(64).not_null())
                    .col(ColumnDef::new(Campaign::Year).integer().not_null())
                    .col(ColumnDef::new(Campaign::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Campaign::TotalDiplomas).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaign::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Campaign::Status).string_len(32).not_null().default("OPEN"))
                    .col(ColumnDef::new(Campaign::MetadataJson).text())
                    .col(
                        ColumnDef::new(Campaign::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Campaign::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_tenant_year")
                    .table(Campaign::Table)
                    .col(Campaign::TenantId)
                    .col(Campaign::Year)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campaign::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Campaign {
    Table,
    Id,
    TenantId,
    Year,
    Name,
    TotalDiplomas,
    StartDate,
    Status,
    MetadataJson,
    CreatedAt,
    UpdatedAt,
}
