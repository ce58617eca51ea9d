//! Create tenant table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenant::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenant::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(Tenant::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Tenant::Slug).string_len(128))
                    .col(ColumnDef::new(Tenant::Description).text())
                    .col(ColumnDef::new(Tenant::TenantType).string_len(32).not_null())
                    .col(ColumnDef::new(Tenant::ParentId).string_len(64))
                    .col(ColumnDef::new(Tenant::LogoUrl).string_len(1024))
                    .col(ColumnDef::new(Tenant::ContactEmail).string_len(256))
                    .col(ColumnDef::new(Tenant::ContactPhone).string_len(64))
                    .col(ColumnDef::new(Tenant::LegalStatus).string_len(32))
                    .col(ColumnDef::new(Tenant::RegistrationNumber).string_len(128))
                    .col(ColumnDef::new(Tenant::SettingsJson).text())
                    .col(ColumnDef::new(Tenant::SecurityJson).text())
                    .col(ColumnDef::new(Tenant::Status).string_len(32).not_null().default("ACTIVE"))
                    .col(ColumnDef::new(Tenant::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Tenant::MaxUsers).integer().not_null().default(100))
                    .col(ColumnDef::new(Tenant::MaxDiplomas).integer().not_null().default(10000))
                    .col(ColumnDef::new(Tenant::StorageQuotaMb).integer().not_null().default(1000))
                    .col(ColumnDef::new(Tenant::CreatedBy).string_len(64))
                    .col(
                        ColumnDef::new(Tenant::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Tenant::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_name")
                    .table(Tenant::Table)
                    .col(Tenant::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_slug")
                    .table(Tenant::Table)
                    .col(Tenant::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_parent_id")
                    .table(Tenant::Table)
                    .col(Tenant::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tenant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tenant {
    Table,
    Id,
    Name,
    Slug,
    Description,
    TenantType,
    ParentId,
    LogoUrl,
    ContactEmail,
    ContactPhone,
    LegalStatus,
    RegistrationNumber,
    SettingsJson,
    SecurityJson,
    Status,
    IsActive,
    MaxUsers,
    MaxDiplomas,
    StorageQuotaMb,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
