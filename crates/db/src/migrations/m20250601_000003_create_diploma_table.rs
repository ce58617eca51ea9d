//! Create diploma table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Diploma::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Diploma::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(Diploma::StudentMatricule).string_len(128).not_null())
                    .col(ColumnDef::new(Diploma::StudentName).string_len(256).not_null())
                    .col(ColumnDef::new(Diploma::Program).string_len(256).not_null())
                    .col(ColumnDef::new(Diploma::Session).string_len(8).not_null())
                    .col(ColumnDef::new(Diploma::AcademicLevel).string_len(64))
                    .col(ColumnDef::new(Diploma::TenantId).string_len(64).not_null())
                    .col(ColumnDef::new(Diploma::Status).string_len(32).not_null().default("DRAFT"))
                    .col(ColumnDef::new(Diploma::MetadataJson).text())
                    .col(ColumnDef::new(Diploma::BlockchainTxId).string_len(128))
                    .col(ColumnDef::new(Diploma::BlockchainAnchoredAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Diploma::CreatedBy).string_len(64))
                    .col(
                        ColumnDef::new(Diploma::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Diploma::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diploma_tenant_status")
                    .table(Diploma::Table)
                    .col(Diploma::TenantId)
                    .col(Diploma::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diploma_matricule_tenant")
                    .table(Diploma::Table)
                    .col(Diploma::StudentMatricule)
                    .col(Diploma::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diploma_program_session")
                    .table(Diploma::Table)
                    .col(Diploma::Program)
                    .col(Diploma::Session)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diploma_issued_at")
                    .table(Diploma::Table)
                    .col(Diploma::IssuedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Diploma::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Diploma {
    Table,
    Id,
    StudentMatricule,
    StudentName,
    Program,
    Session,
    AcademicLevel,
    TenantId,
    Status,
    MetadataJson,
    BlockchainTxId,
    BlockchainAnchoredAt,
    CreatedBy,
    IssuedAt,
    UpdatedAt,
}
