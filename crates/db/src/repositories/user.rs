//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use sceau_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by email. The lookup is case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List users in a tenant, newest first.
    pub async fn find_by_tenant(
        &self,
        tenant_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List ACTIVE users in a tenant holding one of the given roles.
    pub async fn find_active_by_roles(
        &self,
        tenant_id: &str,
        roles: &[&str],
    ) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .filter(user::Column::Status.eq("ACTIVE"))
            .filter(user::Column::Role.is_in(roles.iter().map(ToString::to_string)))
            .order_by_asc(user::Column::FullName)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users in a tenant.
    pub async fn count_by_tenant(&self, tenant_id: &str) -> AppResult<u64> {
        User::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
