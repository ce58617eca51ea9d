//! User management service.

use chrono::Utc;
use sceau_common::{AppError, AppResult, new_id};
use sceau_db::entities::user;
use sceau_db::repositories::{TenantRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::access::{require_role, require_tenant};
use crate::roles::{DIPLOMA_SIGN_ROLES, Role};
use crate::services::audit::{AuditEvent, AuditService};
use crate::services::auth::hash_password;
use crate::status::{USER_ACTIVE, USER_INACTIVE};

/// Input for creating a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub full_name: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
    pub tenant_id: String,
}

/// Input for updating one's own profile.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 256))]
    pub full_name: Option<String>,
    #[validate(length(max = 128))]
    pub official_title: Option<String>,
}

/// Fields an administrator may change on another account.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 256))]
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<String>,
    #[validate(length(max = 128))]
    pub official_title: Option<String>,
    pub signature_img: Option<String>,
    pub stamp_img: Option<String>,
}

/// Input for configuring signing assets.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSetupInput {
    pub signature_img: Option<String>,
    pub stamp_img: Option<String>,
    #[validate(length(max = 128))]
    pub official_title: Option<String>,
}

/// Signer listing entry: who can sign, and whether their assets are set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerView {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub official_title: Option<String>,
    pub has_signature: bool,
    pub has_stamp: bool,
}

impl From<user::Model> for SignerView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            role: u.role,
            official_title: u.official_title,
            has_signature: u.signature_img.is_some(),
            has_stamp: u.stamp_img.is_some(),
        }
    }
}

/// Service for managing user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    tenant_repo: TenantRepository,
    audit: AuditService,
    fast_hashing: bool,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        tenant_repo: TenantRepository,
        audit: AuditService,
        fast_hashing: bool,
    ) -> Self {
        Self {
            user_repo,
            tenant_repo,
            audit,
            fast_hashing,
        }
    }

    /// Create a user in a tenant.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateUserInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        require_role(actor, &[Role::Admin, Role::SuperAdmin])?;
        require_tenant(actor, &input.tenant_id)?;

        self.tenant_repo.get_by_id(&input.tenant_id).await?;

        let email = input.email.to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Email already registered: {email}"
            )));
        }

        let model = user::ActiveModel {
            id: Set(new_id()),
            email: Set(email),
            full_name: Set(input.full_name),
            password_hash: Set(hash_password(&input.password, self.fast_hashing)?),
            role: Set(input.role.as_str().to_string()),
            tenant_id: Set(input.tenant_id),
            status: Set(USER_ACTIVE.to_string()),
            last_login: Set(None),
            signature_img: Set(None),
            stamp_img: Set(None),
            official_title: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.user_repo.create(model).await?;

        self.audit
            .record(AuditEvent::by(actor, "USER_CREATE", "user").entity(&created.id))
            .await;

        Ok(created)
    }

    /// Get a user by id, tenant-guarded.
    pub async fn get(&self, actor: &user::Model, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        require_tenant(actor, &user.tenant_id)?;
        Ok(user)
    }

    /// List users in a tenant.
    pub async fn list(
        &self,
        actor: &user::Model,
        tenant_id: &str,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<user::Model>> {
        require_tenant(actor, tenant_id)?;
        self.user_repo
            .find_by_tenant(tenant_id, limit.min(500), skip)
            .await
    }

    /// List ACTIVE signer-capable users in the actor's tenant.
    pub async fn signers(&self, actor: &user::Model) -> AppResult<Vec<SignerView>> {
        let roles: Vec<&str> = DIPLOMA_SIGN_ROLES.iter().map(|r| r.as_str()).collect();
        let users = self
            .user_repo
            .find_active_by_roles(&actor.tenant_id, &roles)
            .await?;
        Ok(users.into_iter().map(SignerView::from).collect())
    }

    /// Update the actor's own profile fields.
    pub async fn update_profile(
        &self,
        actor: &user::Model,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let mut active: user::ActiveModel = actor.clone().into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(title) = input.official_title {
            active.official_title = Set(Some(title));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Configure the actor's signature image, stamp and title.
    pub async fn setup_signature(
        &self,
        actor: &user::Model,
        input: SignatureSetupInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let mut active: user::ActiveModel = actor.clone().into();
        if let Some(img) = input.signature_img {
            active.signature_img = Set(Some(img));
        }
        if let Some(img) = input.stamp_img {
            active.stamp_img = Set(Some(img));
        }
        if let Some(title) = input.official_title {
            active.official_title = Set(Some(title));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(active).await?;

        self.audit
            .record(AuditEvent::by(actor, "SIGNATURE_SETUP", "user").entity(&updated.id))
            .await;

        Ok(updated)
    }

    /// Administrative update of another account, tenant- and
    /// role-guarded.
    pub async fn update(
        &self,
        actor: &user::Model,
        user_id: &str,
        input: UpdateUserInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        require_role(actor, &[Role::Admin, Role::SuperAdmin])?;

        let target = self.user_repo.get_by_id(user_id).await?;
        require_tenant(actor, &target.tenant_id)?;

        if let Some(status) = &input.status {
            if status != USER_ACTIVE && status != USER_INACTIVE {
                return Err(AppError::BadRequest(format!("Unknown status: {status}")));
            }
        }

        let mut active: user::ActiveModel = target.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(role) = input.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(title) = input.official_title {
            active.official_title = Set(Some(title));
        }
        if let Some(img) = input.signature_img {
            active.signature_img = Set(Some(img));
        }
        if let Some(img) = input.stamp_img {
            active.stamp_img = Set(Some(img));
        }
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.user_repo.update(active).await?;

        self.audit
            .record(AuditEvent::by(actor, "USER_UPDATE", "user").entity(&updated.id))
            .await;

        Ok(updated)
    }

    /// Flip a user between ACTIVE and INACTIVE.
    pub async fn toggle_status(
        &self,
        actor: &user::Model,
        user_id: &str,
    ) -> AppResult<user::Model> {
        require_role(actor, &[Role::Admin, Role::SuperAdmin])?;

        if actor.id == user_id {
            return Err(AppError::BadRequest(
                "Cannot deactivate your own account".to_string(),
            ));
        }

        let target = self.user_repo.get_by_id(user_id).await?;
        require_tenant(actor, &target.tenant_id)?;

        let next = if target.status == USER_ACTIVE {
            USER_INACTIVE
        } else {
            USER_ACTIVE
        };

        let mut active: user::ActiveModel = target.into();
        active.status = Set(next.to_string());
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.user_repo.update(active).await?;

        self.audit
            .record(
                AuditEvent::by(actor, "USER_STATUS_TOGGLE", "user")
                    .entity(&updated.id)
                    .details(format!("status={next}")),
            )
            .await;

        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, role: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@uni.test"),
            full_name: "Test User".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
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

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> UserService {
        UserService::new(
            UserRepository::new(db.clone()),
            TenantRepository::new(db.clone()),
            AuditService::new(
                sceau_db::repositories::AuditLogRepository::new(db.clone()),
                UserRepository::new(db),
            ),
            true,
        )
    }

    #[tokio::test]
    async fn test_toggle_own_account_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let actor = test_user("user-1", "ADMIN");

        let result = service(db).toggle_status(&actor, "user-1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_toggle_forbidden_for_viewer() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let actor = test_user("user-1", "VIEWER");

        let result = service(db).toggle_status(&actor, "user-2").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_forbidden_for_viewer() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let actor = test_user("user-1", "VIEWER");

        let result = service(db)
            .update(&actor, "user-2", UpdateUserInput::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_cross_tenant_target() {
        let mut target = test_user("user-2", "SIGNER");
        target.tenant_id = "tenant-2".to_string();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .into_connection(),
        );

        let actor = test_user("user-1", "ADMIN");
        let result = service(db)
            .update(&actor, "user-2", UpdateUserInput::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("user-2", "SIGNER")]])
                .into_connection(),
        );

        let actor = test_user("user-1", "ADMIN");
        let input = UpdateUserInput {
            status: Some("SUSPENDED".to_string()),
            ..UpdateUserInput::default()
        };
        let result = service(db).update(&actor, "user-2", input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_changes_role_and_title() {
        let target = test_user("user-2", "SIGNER");
        let mut updated = test_user("user-2", "DEAN");
        updated.official_title = Some("Doyen".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let actor = test_user("user-1", "ADMIN");
        let input = UpdateUserInput {
            role: Some(Role::Dean),
            official_title: Some("Doyen".to_string()),
            ..UpdateUserInput::default()
        };
        let user = service(db).update(&actor, "user-2", input).await.unwrap();

        assert_eq!(user.role, "DEAN");
        assert_eq!(user.official_title.as_deref(), Some("Doyen"));
    }

    #[tokio::test]
    async fn test_signers_maps_asset_flags() {
        let mut signer = test_user("user-2", "SIGNER");
        signer.signature_img = Some("data:image/png;base64,abc".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[signer]])
                .into_connection(),
        );

        let actor = test_user("user-1", "ADMIN");
        let signers = service(db).signers(&actor).await.unwrap();

        assert_eq!(signers.len(), 1);
        assert!(signers[0].has_signature);
        assert!(!signers[0].has_stamp);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_is_conflict() {
        let existing = test_user("user-9", "VIEWER");
        let tenant = sceau_db::entities::tenant::Model {
            id: "tenant-1".to_string(),
            name: "State University".to_string(),
            slug: None,
            description: None,
            tenant_type: "UNIVERSITY".to_string(),
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
            max_diplomas: 10000,
            storage_quota_mb: 1000,
            created_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tenant]])
                .append_query_results([[existing]])
                .into_connection(),
        );

        let actor = test_user("user-1", "ADMIN");
        let result = service(db)
            .create(
                &actor,
                CreateUserInput {
                    email: "user-9@uni.test".to_string(),
                    full_name: "Dup".to_string(),
                    password: "long-enough-pw".to_string(),
                    role: Role::Viewer,
                    tenant_id: "tenant-1".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
