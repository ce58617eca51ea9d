//! Revoked token repository.

use std::sync::Arc;

use crate::entities::{RevokedToken, revoked_token};
use sceau_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Revoked token repository for database operations.
#[derive(Clone)]
pub struct RevokedTokenRepository {
    db: Arc<DatabaseConnection>,
}

impl RevokedTokenRepository {
    /// Create a new revoked token repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a revoked token.
    pub async fn create(
        &self,
        model: revoked_token::ActiveModel,
    ) -> AppResult<revoked_token::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a token identifier has been revoked.
    pub async fn is_revoked(&self, jti: &str) -> AppResult<bool> {
        let found = RevokedToken::find()
            .filter(revoked_token::Column::Jti.eq(jti))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Delete revocation rows whose token has naturally expired.
    pub async fn prune_expired(&self, now: chrono::DateTime<chrono::Utc>) -> AppResult<u64> {
        let result = RevokedToken::delete_many()
            .filter(revoked_token::Column::ExpiresAt.lt(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_is_revoked_hit() {
        let row = revoked_token::Model {
            id: "r1".to_string(),
            jti: "jti-1".to_string(),
            user_id: Some("user-1".to_string()),
            reason: Some("logout".to_string()),
            revoked_at: Utc::now().into(),
            expires_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = RevokedTokenRepository::new(db);
        assert!(repo.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_revoked_miss() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<revoked_token::Model>::new()])
                .into_connection(),
        );

        let repo = RevokedTokenRepository::new(db);
        assert!(!repo.is_revoked("jti-404").await.unwrap());
    }
}
