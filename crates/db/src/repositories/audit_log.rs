//! Audit log repository. Insert and query only, never update.

use std::sync::Arc;

use crate::entities::{AuditLog, audit_log};
use sceau_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Filters for audit queries.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Restrict to entries by these actors.
    pub user_ids: Option<Vec<String>>,
    /// Restrict to an action name.
    pub action: Option<String>,
    /// Restrict to an entity type.
    pub entity_type: Option<String>,
}

/// Audit log repository for database operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an audit entry.
    pub async fn create(&self, model: audit_log::ActiveModel) -> AppResult<audit_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Query audit entries, newest first.
    pub async fn find_filtered(
        &self,
        filter: &AuditFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        let mut query = AuditLog::find();

        if let Some(user_ids) = &filter.user_ids {
            query = query.filter(audit_log::Column::UserId.is_in(user_ids.clone()));
        }
        if let Some(action) = &filter.action {
            query = query.filter(audit_log::Column::Action.eq(action));
        }
        if let Some(entity_type) = &filter.entity_type {
            query = query.filter(audit_log::Column::EntityType.eq(entity_type));
        }

        query
            .order_by_desc(audit_log::Column::Timestamp)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
