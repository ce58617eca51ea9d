//! First-boot seeding.
//!
//! Guarantees a usable installation: a root tenant and a SUPER_ADMIN
//! exist after startup, whether this is the first boot or the
//! thousandth. Concurrent replicas racing on insert are tolerated.

use chrono::Utc;
use sceau_common::{AppResult, SeedConfig, new_id};
use sceau_db::entities::{tenant, user};
use sceau_db::repositories::{TenantRepository, UserRepository};
use sea_orm::Set;
use tracing::{info, warn};

use crate::roles::Role;
use crate::services::auth::hash_password;
use crate::services::tenant::default_settings;
use crate::status::{TENANT_ACTIVE, USER_ACTIVE};

/// Seeds the default tenant and administrator.
#[derive(Clone)]
pub struct BootstrapService {
    tenant_repo: TenantRepository,
    user_repo: UserRepository,
    fast_hashing: bool,
}

impl BootstrapService {
    /// Create a new bootstrap service.
    #[must_use]
    pub const fn new(tenant_repo: TenantRepository, user_repo: UserRepository, fast_hashing: bool) -> Self {
        Self {
            tenant_repo,
            user_repo,
            fast_hashing,
        }
    }

    /// Ensure the seed tenant and administrator exist. Idempotent.
    pub async fn run(&self, seed: &SeedConfig) -> AppResult<()> {
        let tenant = self.ensure_tenant(seed).await?;
        self.ensure_admin(seed, &tenant.id).await?;
        Ok(())
    }

    async fn ensure_tenant(&self, seed: &SeedConfig) -> AppResult<tenant::Model> {
        if let Some(existing) = self.tenant_repo.find_by_name(&seed.tenant_name).await? {
            return Ok(existing);
        }

        let model = tenant::ActiveModel {
            id: Set(new_id()),
            name: Set(seed.tenant_name.clone()),
            slug: Set(Some(seed.tenant_slug.clone())),
            description: Set(None),
            tenant_type: Set("MINISTRY".to_string()),
            parent_id: Set(None),
            logo_url: Set(None),
            contact_email: Set(None),
            contact_phone: Set(None),
            legal_status: Set(None),
            registration_number: Set(None),
            settings_json: Set(Some(default_settings().to_string())),
            security_json: Set(None),
            status: Set(TENANT_ACTIVE.to_string()),
            is_active: Set(true),
            max_users: Set(100),
            max_diplomas: Set(10_000),
            storage_quota_mb: Set(1000),
            created_by: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        match self.tenant_repo.create(model).await {
            Ok(created) => {
                info!(tenant = %created.name, "Seeded default tenant");
                Ok(created)
            }
            // Another replica may have won the insert race.
            Err(e) => match self.tenant_repo.find_by_name(&seed.tenant_name).await? {
                Some(existing) => {
                    warn!(error = %e, "Tenant seed insert lost a race, reusing existing row");
                    Ok(existing)
                }
                None => Err(e),
            },
        }
    }

    async fn ensure_admin(&self, seed: &SeedConfig, tenant_id: &str) -> AppResult<()> {
        if self
            .user_repo
            .find_by_email(&seed.admin_email)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let model = user::ActiveModel {
            id: Set(new_id()),
            email: Set(seed.admin_email.to_lowercase()),
            full_name: Set("Super Administrator".to_string()),
            password_hash: Set(hash_password(&seed.admin_password, self.fast_hashing)?),
            role: Set(Role::SuperAdmin.as_str().to_string()),
            tenant_id: Set(tenant_id.to_string()),
            status: Set(USER_ACTIVE.to_string()),
            last_login: Set(None),
            signature_img: Set(None),
            stamp_img: Set(None),
            official_title: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        match self.user_repo.create(model).await {
            Ok(created) => {
                info!(email = %created.email, "Seeded default administrator");
                Ok(())
            }
            Err(e) => {
                if self
                    .user_repo
                    .find_by_email(&seed.admin_email)
                    .await?
                    .is_some()
                {
                    warn!(error = %e, "Admin seed insert lost a race, reusing existing row");
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_tenant() -> tenant::Model {
        tenant::Model {
            id: "tenant-1".to_string(),
            name: "Default Ministry".to_string(),
            slug: Some("default-ministry".to_string()),
            description: None,
            tenant_type: "MINISTRY".to_string(),
            parent_id: None,
            logo_url: None,
            contact_email: None,
            contact_phone: None,
            legal_status: None,
            registration_number: None,
            settings_json: None,
            security_json: None,
            status: "ACTIVE".to_string(),
            is_active: true,
            max_users: 100,
            max_diplomas: 10_000,
            storage_quota_mb: 1000,
            created_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_admin() -> user::Model {
        user::Model {
            id: "user-1".to_string(),
            email: "admin@sceau.local".to_string(),
            full_name: "Super Administrator".to_string(),
            password_hash: String::new(),
            role: "SUPER_ADMIN".to_string(),
            tenant_id: "tenant-1".to_string(),
            status: "ACTIVE".to_string(),
            last_login: None,
            signature_img: None,
            stamp_img: None,
            official_title: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent_when_seeded() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_tenant()]])
                .append_query_results([[test_admin()]])
                .into_connection(),
        );

        let service = BootstrapService::new(
            TenantRepository::new(db.clone()),
            UserRepository::new(db),
            true,
        );
        service.run(&SeedConfig::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_missing_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Tenant lookup hits.
                .append_query_results([[test_tenant()]])
                // Admin lookup misses, then the insert lands.
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[test_admin()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = BootstrapService::new(
            TenantRepository::new(db.clone()),
            UserRepository::new(db),
            true,
        );
        service.run(&SeedConfig::default()).await.unwrap();
    }
}
