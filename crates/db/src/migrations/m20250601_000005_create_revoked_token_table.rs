//! Create revoked token table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RevokedToken::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RevokedToken::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(RevokedToken::Jti).string_len(64).not_null())
                    .col(ColumnDef::new(RevokedToken::UserId).string_len(64))
                    .col(ColumnDef::new(RevokedToken::Reason).string_len(256))
                    .col(
                        ColumnDef::new(RevokedToken::RevokedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RevokedToken::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_revoked_token_jti")
                    .table(RevokedToken::Table)
                    .col(RevokedToken::Jti)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_revoked_token_expires_at")
                    .table(RevokedToken::Table)
                    .col(RevokedToken::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RevokedToken::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RevokedToken {
    Table,
    Id,
    Jti,
    UserId,
    Reason,
    RevokedAt,
    ExpiresAt,
}
