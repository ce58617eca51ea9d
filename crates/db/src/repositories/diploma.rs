//! Diploma repository.

use std::sync::Arc;

use crate::entities::{Diploma, diploma};
use sceau_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Filters for diploma listing.
#[derive(Debug, Clone, Default)]
pub struct DiplomaFilter {
    /// Restrict to a lifecycle status.
    pub status: Option<String>,
    /// Restrict to a degree program.
    pub program: Option<String>,
    /// Restrict to an academic session.
    pub session: Option<String>,
}

/// Diploma repository for database operations.
#[derive(Clone)]
pub struct DiplomaRepository {
    db: Arc<DatabaseConnection>,
}

impl DiplomaRepository {
    /// Create a new diploma repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a diploma by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<diploma::Model>> {
        Diploma::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a diploma by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<diploma::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DiplomaNotFound(id.to_string()))
    }

    /// Create a new diploma.
    pub async fn create(&self, model: diploma::ActiveModel) -> AppResult<diploma::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a diploma.
    pub async fn update(&self, model: diploma::ActiveModel) -> AppResult<diploma::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List diplomas in a tenant with optional filters, newest first.
    pub async fn find_by_tenant(
        &self,
        tenant_id: &str,
        filter: &DiplomaFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<diploma::Model>> {
        let mut query = Diploma::find().filter(diploma::Column::TenantId.eq(tenant_id));

        if let Some(status) = &filter.status {
            query = query.filter(diploma::Column::Status.eq(status));
        }
        if let Some(program) = &filter.program {
            query = query.filter(diploma::Column::Program.eq(program));
        }
        if let Some(session) = &filter.session {
            query = query.filter(diploma::Column::Session.eq(session));
        }

        query
            .order_by_desc(diploma::Column::IssuedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a diploma with the same matricule and session in a tenant.
    ///
    /// Used for duplicate detection during imports.
    pub async fn find_duplicate(
        &self,
        tenant_id: &str,
        matricule: &str,
        session: &str,
    ) -> AppResult<Option<diploma::Model>> {
        Diploma::find()
            .filter(diploma::Column::TenantId.eq(tenant_id))
            .filter(diploma::Column::StudentMatricule.eq(matricule))
            .filter(diploma::Column::Session.eq(session))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List diplomas in a tenant awaiting signatures.
    pub async fn find_awaiting_signature(&self, tenant_id: &str) -> AppResult<Vec<diploma::Model>> {
        Diploma::find()
            .filter(diploma::Column::TenantId.eq(tenant_id))
            .filter(
                diploma::Column::Status.is_in(["VALIDATED".to_string(), "PARTIALLY_SIGNED".to_string()]),
            )
            .order_by_desc(diploma::Column::IssuedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count diplomas in a tenant.
    pub async fn count_by_tenant(&self, tenant_id: &str) -> AppResult<u64> {
        Diploma::find()
            .filter(diploma::Column::TenantId.eq(tenant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count anchored diplomas in a tenant.
    pub async fn count_anchored(&self, tenant_id: &str) -> AppResult<u64> {
        Diploma::find()
            .filter(diploma::Column::TenantId.eq(tenant_id))
            .filter(diploma::Column::BlockchainTxId.is_not_null())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Per-status diploma counts for a tenant.
    pub async fn count_by_status(&self, tenant_id: &str) -> AppResult<Vec<(String, i64)>> {
        Diploma::find()
            .select_only()
            .column(diploma::Column::Status)
            .column_as(Expr::col(diploma::Column::Id).count(), "count")
            .filter(diploma::Column::TenantId.eq(tenant_id))
            .group_by(diploma::Column::Status)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Per-program diploma counts for a tenant.
    pub async fn count_by_program(&self, tenant_id: &str) -> AppResult<Vec<(String, i64)>> {
        Diploma::find()
            .select_only()
            .column(diploma::Column::Program)
            .column_as(Expr::col(diploma::Column::Id).count(), "count")
            .filter(diploma::Column::TenantId.eq(tenant_id))
            .group_by(diploma::Column::Program)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_diploma(id: &str, status: &str) -> diploma::Model {
        diploma::Model {
            id: id.to_string(),
            student_matricule: "MAT-001".to_string(),
            student_name: "Awa Ndiaye".to_string(),
            program: "Licence Informatique".to_string(),
            session: "2025".to_string(),
            academic_level: Some("Licence".to_string()),
            tenant_id: "tenant-1".to_string(),
            status: status.to_string(),
            metadata_json: None,
            blockchain_tx_id: None,
            blockchain_anchored_at: None,
            created_by: Some("user-1".to_string()),
            issued_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let diploma = create_test_diploma("d".repeat(64).as_str(), "DRAFT");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[diploma.clone()]])
                .into_connection(),
        );

        let repo = DiplomaRepository::new(db);
        let result = repo.find_by_id(&diploma.id).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().status, "DRAFT");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<diploma::Model>::new()])
                .into_connection(),
        );

        let repo = DiplomaRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::DiplomaNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_awaiting_signature_returns_rows() {
        let validated = create_test_diploma("a1", "VALIDATED");
        let partial = create_test_diploma("a2", "PARTIALLY_SIGNED");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[validated, partial]])
                .into_connection(),
        );

        let repo = DiplomaRepository::new(db);
        let result = repo.find_awaiting_signature("tenant-1").await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_duplicate_miss() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<diploma::Model>::new()])
                .into_connection(),
        );

        let repo = DiplomaRepository::new(db);
        let result = repo
            .find_duplicate("tenant-1", "MAT-404", "2025")
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
