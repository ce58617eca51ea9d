//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(User::Email).string_len(256).not_null())
                    .col(ColumnDef::new(User::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(User::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(User::Role).string_len(32).not_null())
                    .col(ColumnDef::new(User::TenantId).string_len(64).not_null())
                    .col(ColumnDef::new(User::Status).string_len(32).not_null().default("ACTIVE"))
                    .col(ColumnDef::new(User::LastLogin).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::SignatureImg).text())
                    .col(ColumnDef::new(User::StampImg).text())
                    .col(ColumnDef::new(User::OfficialTitle).string_len(128))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_tenant_status")
                    .table(User::Table)
                    .col(User::TenantId)
                    .col(User::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Email,
    FullName,
    PasswordHash,
    Role,
    TenantId,
    Status,
    LastLogin,
    SignatureImg,
    StampImg,
    OfficialTitle,
    CreatedAt,
    UpdatedAt,
}
