//! Create audit log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLog::Id).string_len(64).not_null().primary_key())
                    .col(
                        ColumnDef::new(AuditLog::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(AuditLog::UserId).string_len(64))
                    .col(ColumnDef::new(AuditLog::UserEmail).string_len(256))
                    .col(ColumnDef::new(AuditLog::Action).string_len(64).not_null())
                    .col(ColumnDef::new(AuditLog::EntityType).string_len(64).not_null())
                    .col(ColumnDef::new(AuditLog::EntityId).string_len(128))
                    .col(ColumnDef::new(AuditLog::Details).text())
                    .col(ColumnDef::new(AuditLog::IpAddress).string_len(64))
                    .col(ColumnDef::new(AuditLog::UserAgent).string_len(512))
                    .col(ColumnDef::new(AuditLog::Hash).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_hash")
                    .table(AuditLog::Table)
                    .col(AuditLog::Hash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_timestamp")
                    .table(AuditLog::Table)
                    .col(AuditLog::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_user_id")
                    .table(AuditLog::Table)
                    .col(AuditLog::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuditLog {
    Table,
    Id,
    Timestamp,
    UserId,
    UserEmail,
    Action,
    EntityType,
    EntityId,
    Details,
    IpAddress,
    UserAgent,
    Hash,
}
