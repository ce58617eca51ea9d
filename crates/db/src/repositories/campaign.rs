//! Campaign repository.

use std::sync::Arc;

use crate::entities::{Campaign, campaign};
use sceau_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Campaign repository for database operations.
#[derive(Clone)]
pub struct CampaignRepository {
    db: Arc<DatabaseConnection>,
}

impl CampaignRepository {
    /// Create a new campaign repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a campaign by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<campaign::Model>> {
        Campaign::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a campaign by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<campaign::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Campaign not found: {id}")))
    }

    /// Create a new campaign.
    pub async fn create(&self, model: campaign::ActiveModel) -> AppResult<campaign::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a campaign.
    pub async fn update(&self, model: campaign::ActiveModel) -> AppResult<campaign::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List campaigns in a tenant, most recent year first.
    pub async fn find_by_tenant(&self, tenant_id: &str) -> AppResult<Vec<campaign::Model>> {
        Campaign::find()
            .filter(campaign::Column::TenantId.eq(tenant_id))
            .order_by_desc(campaign::Column::Year)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
