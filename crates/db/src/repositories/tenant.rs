//! Tenant repository.

use std::sync::Arc;

use crate::entities::{Tenant, tenant};
use sceau_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Filters for tenant listing.
#[derive(Debug, Clone, Default)]
pub struct TenantFilter {
    /// Restrict to a lifecycle status.
    pub status: Option<String>,
    /// Restrict to a tenant type.
    pub tenant_type: Option<String>,
    /// Restrict to a tenant and its direct children (non-admin view).
    pub visible_from: Option<String>,
}

/// Tenant repository for database operations.
#[derive(Clone)]
pub struct TenantRepository {
    db: Arc<DatabaseConnection>,
}

impl TenantRepository {
    /// Create a new tenant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tenant by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<tenant::Model>> {
        Tenant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tenant by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<tenant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TenantNotFound(id.to_string()))
    }

    /// Find a tenant by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<tenant::Model>> {
        Tenant::find()
            .filter(tenant::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tenant by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tenant::Model>> {
        Tenant::find()
            .filter(tenant::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tenant.
    pub async fn create(&self, model: tenant::ActiveModel) -> AppResult<tenant::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a tenant.
    pub async fn update(&self, model: tenant::ActiveModel) -> AppResult<tenant::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List tenants with optional filters, name order.
    pub async fn find_filtered(
        &self,
        filter: &TenantFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<tenant::Model>> {
        let mut query = Tenant::find();

        if let Some(status) = &filter.status {
            query = query.filter(tenant::Column::Status.eq(status));
        }
        if let Some(tenant_type) = &filter.tenant_type {
            query = query.filter(tenant::Column::TenantType.eq(tenant_type));
        }
        if let Some(root) = &filter.visible_from {
            query = query.filter(
                Condition::any()
                    .add(tenant::Column::Id.eq(root))
                    .add(tenant::Column::ParentId.eq(root)),
            );
        }

        query
            .order_by_asc(tenant::Column::Name)
            .offset(offset)
            .limit(limit)
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

    fn create_test_tenant(id: &str, name: &str) -> tenant::Model {
        tenant::Model {
            id: id.to_string(),
            name: name.to_string(),
            slug: Some(name.to_lowercase().replace(' ', "-")),
            description: None,
            tenant_type: "UNIVERSITY".to_string(),
            parent_id: None,
            logo_url: None,
            contact_email: None,
            contact_phone: None,
            legal_status: Some("PUBLIC".to_string()),
            registration_number: None,
            settings_json: None,
            security_json: None,
            status: "ACTIVE".to_string(),
            is_active: true,
            max_users: 100,
            max_diplomas: 10000,
            storage_quota_mb: 1000,
            created_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tenant::Model>::new()])
                .into_connection(),
        );

        let repo = TenantRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::TenantNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_slug_found() {
        let tenant = create_test_tenant("tenant-1", "State University");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tenant]])
                .into_connection(),
        );

        let repo = TenantRepository::new(db);
        let result = repo.find_by_slug("state-university").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "tenant-1");
    }

    #[tokio::test]
    async fn test_find_filtered_returns_rows() {
        let tenant = create_test_tenant("tenant-1", "State University");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tenant]])
                .into_connection(),
        );

        let repo = TenantRepository::new(db);
        let filter = TenantFilter {
            status: Some("ACTIVE".to_string()),
            ..TenantFilter::default()
        };
        let result = repo.find_filtered(&filter, 50, 0).await.unwrap();

        assert_eq!(result.len(), 1);
    }
}
