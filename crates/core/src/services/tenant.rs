//! Tenant directory service.

use chrono::Utc;
use sceau_common::{AppError, AppResult, new_id};
use sceau_db::entities::{tenant, user};
use sceau_db::repositories::{
    DiplomaRepository, TenantFilter, TenantRepository, UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::access::{require_role, require_tenant};
use crate::roles::Role;
use crate::services::audit::{AuditEvent, AuditService};
use crate::status::{TENANT_ACTIVE, TENANT_INACTIVE};

/// Input for creating a tenant.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub slug: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    pub tenant_type: String,
    pub parent_id: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub legal_status: Option<String>,
    pub registration_number: Option<String>,
}

/// Patch for updating a tenant.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub registration_number: Option<String>,
    pub status: Option<String>,
}

/// Listing filters, bound from query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsInput {
    pub status: Option<String>,
    pub tenant_type: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

/// Aggregate counters for a tenant dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantStats {
    pub total_diplomas: u64,
    pub signed_diplomas: u64,
    pub anchored_diplomas: u64,
    pub total_users: u64,
    pub by_status: Vec<StatusCount>,
    pub by_program: Vec<StatusCount>,
}

/// One rollup bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub key: String,
    pub count: i64,
}

/// The settings document every tenant starts from.
///
/// Tenant-specific values are layered over this via deep merge.
#[must_use]
pub fn default_settings() -> Value {
    serde_json::json!({
        "diplomaFields": {
            "studentMatricule": { "required": true, "label": "Matricule" },
            "studentName": { "required": true, "label": "Nom complet" },
            "program": { "required": true, "label": "Filière" },
            "session": { "required": true, "label": "Session" },
            "academicLevel": { "required": false, "label": "Niveau" }
        },
        "features": {
            "excelImport": true,
            "publicVerification": true,
            "campaigns": true
        },
        "signatureRequired": 2,
        "defaultLanguage": "fr"
    })
}

/// Key-by-key recursive merge of `patch` into `base`.
///
/// Objects merge recursively; any other value in the patch replaces the
/// base value. Patch `null` removes the key.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                if patch_value.is_null() {
                    base_map.remove(key);
                } else if let Some(base_value) = base_map.get_mut(key) {
                    deep_merge(base_value, patch_value);
                } else {
                    base_map.insert(key.clone(), patch_value.clone());
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

/// Service for the tenant directory.
#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    user_repo: UserRepository,
    diploma_repo: DiplomaRepository,
    audit: AuditService,
}

impl TenantService {
    /// Create a new tenant service.
    #[must_use]
    pub const fn new(
        tenant_repo: TenantRepository,
        user_repo: UserRepository,
        diploma_repo: DiplomaRepository,
        audit: AuditService,
    ) -> Self {
        Self {
            tenant_repo,
            user_repo,
            diploma_repo,
            audit,
        }
    }

    /// Create a tenant. SUPER_ADMIN only.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateTenantInput,
    ) -> AppResult<tenant::Model> {
        input.validate()?;
        require_role(actor, &[Role::SuperAdmin])?;

        if self.tenant_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Tenant name already in use: {}",
                input.name
            )));
        }
        if let Some(slug) = &input.slug {
            if self.tenant_repo.find_by_slug(slug).await?.is_some() {
                return Err(AppError::Conflict(format!("Slug already in use: {slug}")));
            }
        }
        if let Some(parent_id) = &input.parent_id {
            self.tenant_repo.get_by_id(parent_id).await?;
        }

        let model = tenant::ActiveModel {
            id: Set(new_id()),
            name: Set(input.name),
            slug: Set(input.slug),
            description: Set(input.description),
            tenant_type: Set(input.tenant_type),
            parent_id: Set(input.parent_id),
            logo_url: Set(None),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
            legal_status: Set(input.legal_status),
            registration_number: Set(input.registration_number),
            settings_json: Set(Some(default_settings().to_string())),
            security_json: Set(None),
            status: Set(TENANT_ACTIVE.to_string()),
            is_active: Set(true),
            max_users: Set(100),
            max_diplomas: Set(10000),
            storage_quota_mb: Set(1000),
            created_by: Set(Some(actor.id.clone())),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.tenant_repo.create(model).await?;

        self.audit
            .record(AuditEvent::by(actor, "TENANT_CREATE", "tenant").entity(&created.id))
            .await;

        Ok(created)
    }

    /// Get a tenant, tenant-guarded.
    pub async fn get(&self, actor: &user::Model, tenant_id: &str) -> AppResult<tenant::Model> {
        let tenant = self.tenant_repo.get_by_id(tenant_id).await?;
        require_tenant(actor, &tenant.id)?;
        Ok(tenant)
    }

    /// List tenants. Non-SUPER_ADMIN sees their tenant and its direct
    /// children.
    pub async fn list(
        &self,
        actor: &user::Model,
        input: ListTenantsInput,
    ) -> AppResult<Vec<tenant::Model>> {
        let visible_from = if actor.role == Role::SuperAdmin.as_str() {
            None
        } else {
            Some(actor.tenant_id.clone())
        };

        let filter = TenantFilter {
            status: input.status,
            tenant_type: input.tenant_type,
            visible_from,
        };
        let limit = input.limit.unwrap_or(50).min(500);

        self.tenant_repo.find_filtered(&filter, limit, input.skip).await
    }

    /// General patch of tenant fields.
    pub async fn update(
        &self,
        actor: &user::Model,
        tenant_id: &str,
        input: UpdateTenantInput,
    ) -> AppResult<tenant::Model> {
        input.validate()?;
        require_role(actor, &[Role::Admin, Role::SuperAdmin])?;
        let tenant = self.tenant_repo.get_by_id(tenant_id).await?;
        require_tenant(actor, &tenant.id)?;

        let mut active: tenant::ActiveModel = tenant.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(logo_url) = input.logo_url {
            active.logo_url = Set(Some(logo_url));
        }
        if let Some(email) = input.contact_email {
            active.contact_email = Set(Some(email));
        }
        if let Some(phone) = input.contact_phone {
            active.contact_phone = Set(Some(phone));
        }
        if let Some(number) = input.registration_number {
            active.registration_number = Set(Some(number));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.tenant_repo.update(active).await?;

        self.audit
            .record(AuditEvent::by(actor, "TENANT_UPDATE", "tenant").entity(&updated.id))
            .await;

        Ok(updated)
    }

    /// Soft delete: the row stays, flagged inactive. SUPER_ADMIN only.
    pub async fn soft_delete(
        &self,
        actor: &user::Model,
        tenant_id: &str,
    ) -> AppResult<tenant::Model> {
        require_role(actor, &[Role::SuperAdmin])?;
        let tenant = self.tenant_repo.get_by_id(tenant_id).await?;

        let mut active: tenant::ActiveModel = tenant.into();
        active.is_active = Set(false);
        active.status = Set(TENANT_INACTIVE.to_string());
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.tenant_repo.update(active).await?;

        self.audit
            .record(AuditEvent::by(actor, "TENANT_DELETE", "tenant").entity(&updated.id))
            .await;

        Ok(updated)
    }

    /// Effective settings: stored document layered over the defaults.
    pub async fn settings(&self, actor: &user::Model, tenant_id: &str) -> AppResult<Value> {
        let tenant = self.tenant_repo.get_by_id(tenant_id).await?;
        require_tenant(actor, &tenant.id)?;

        let mut merged = default_settings();
        if let Some(raw) = &tenant.settings_json {
            if let Ok(stored) = serde_json::from_str::<Value>(raw) {
                deep_merge(&mut merged, &stored);
            }
        }
        Ok(merged)
    }

    /// Merge a patch into the stored settings, key by key.
    pub async fn update_settings(
        &self,
        actor: &user::Model,
        tenant_id: &str,
        patch: Value,
    ) -> AppResult<Value> {
        require_role(actor, &[Role::Admin, Role::SuperAdmin])?;
        let tenant = self.tenant_repo.get_by_id(tenant_id).await?;
        require_tenant(actor, &tenant.id)?;

        let mut settings = tenant
            .settings_json
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(|| serde_json::json!({}));
        deep_merge(&mut settings, &patch);

        let mut active: tenant::ActiveModel = tenant.into();
        active.settings_json = Set(Some(settings.to_string()));
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.tenant_repo.update(active).await?;

        self.audit
            .record(AuditEvent::by(actor, "TENANT_SETTINGS_UPDATE", "tenant").entity(&updated.id))
            .await;

        let mut merged = default_settings();
        deep_merge(&mut merged, &settings);
        Ok(merged)
    }

    /// Dashboard counters for a tenant.
    pub async fn stats(&self, actor: &user::Model, tenant_id: &str) -> AppResult<TenantStats> {
        let tenant = self.tenant_repo.get_by_id(tenant_id).await?;
        require_tenant(actor, &tenant.id)?;

        let total_diplomas = self.diploma_repo.count_by_tenant(&tenant.id).await?;
        let anchored_diplomas = self.diploma_repo.count_anchored(&tenant.id).await?;
        let by_status: Vec<StatusCount> = self
            .diploma_repo
            .count_by_status(&tenant.id)
            .await?
            .into_iter()
            .map(|(key, count)| StatusCount { key, count })
            .collect();
        let by_program = self
            .diploma_repo
            .count_by_program(&tenant.id)
            .await?
            .into_iter()
            .map(|(key, count)| StatusCount { key, count })
            .collect();
        let total_users = self.user_repo.count_by_tenant(&tenant.id).await?;

        let signed_diplomas = by_status
            .iter()
            .find(|s| s.key == "SIGNED")
            .map_or(0, |s| u64::try_from(s.count).unwrap_or(0));

        Ok(TenantStats {
            total_diplomas,
            signed_diplomas,
            anchored_diplomas,
            total_users,
            by_status,
            by_program,
        })
    }
}
