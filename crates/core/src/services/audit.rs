//! Audit trail service.

use chrono::Utc;
use sceau_common::{AppResult, audit_fingerprint, new_id};
use sceau_db::entities::{audit_log, user};
use sceau_db::repositories::{AuditFilter, AuditLogRepository, UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use tracing::error;

use crate::access::require_role;
use crate::roles::{AUDIT_ROLES, Role};

/// One event to append to the trail.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Acting user, when authenticated.
    pub user_id: Option<String>,
    /// Actor email, denormalized.
    pub user_email: Option<String>,
    /// Action name (e.g. `DIPLOMA_SIGN`).
    pub action: String,
    /// Kind of entity acted on.
    pub entity_type: String,
    /// Identifier of the entity acted on.
    pub entity_id: Option<String>,
    /// Free-form detail text.
    pub details: Option<String>,
    /// Request source address.
    pub ip_address: Option<String>,
    /// Request user agent.
    pub user_agent: Option<String>,
}

impl AuditEvent {
    /// Build an event attributed to a user.
    #[must_use]
    pub fn by(user: &user::Model, action: &str, entity_type: &str) -> Self {
        Self {
            user_id: Some(user.id.clone()),
            user_email: Some(user.email.clone()),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: None,
            details: None,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Build an unattributed event (public endpoints).
    #[must_use]
    pub fn anonymous(action: &str, entity_type: &str) -> Self {
        Self {
            user_id: None,
            user_email: None,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: None,
            details: None,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Attach the entity identifier.
    #[must_use]
    pub fn entity(mut self, entity_id: &str) -> Self {
        self.entity_id = Some(entity_id.to_string());
        self
    }

    /// Attach detail text.
    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Query parameters for reading the trail.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAuditInput {
    /// Restrict to an action name.
    pub action: Option<String>,
    /// Restrict to an entity type.
    pub entity_type: Option<String>,
    /// Rows to skip.
    #[serde(default)]
    pub skip: u64,
    /// Page size.
    pub limit: Option<u64>,
}

/// Service for the append-only audit trail.
#[derive(Clone)]
pub struct AuditService {
    audit_repo: AuditLogRepository,
    user_repo: UserRepository,
}

impl AuditService {
    /// Create a new audit service.
    #[must_use]
    pub const fn new(audit_repo: AuditLogRepository, user_repo: UserRepository) -> Self {
        Self {
            audit_repo,
            user_repo,
        }
    }

    /// Append an event to the trail.
    ///
    /// Failures are logged and swallowed: a broken audit sink must not
    /// fail the operation being audited.
    pub async fn record(&self, event: AuditEvent) {
        let now = Utc::now();
        let hash = audit_fingerprint(
            event.user_id.as_deref().unwrap_or("anonymous"),
            &event.action,
            &event.entity_type,
            event.entity_id.as_deref().unwrap_or(""),
        );

        let model = audit_log::ActiveModel {
            id: Set(new_id()),
            timestamp: Set(now.into()),
            user_id: Set(event.user_id),
            user_email: Set(event.user_email),
            action: Set(event.action.clone()),
            entity_type: Set(event.entity_type),
            entity_id: Set(event.entity_id),
            details: Set(event.details),
            ip_address: Set(event.ip_address),
            user_agent: Set(event.user_agent),
            hash: Set(hash),
        };

        if let Err(e) = self.audit_repo.create(model).await {
            error!(action = %event.action, error = %e, "Failed to record audit entry");
        }
    }

    /// Read the trail. ADMIN sees their tenant, SUPER_ADMIN everything.
    pub async fn query(
        &self,
        actor: &user::Model,
        input: QueryAuditInput,
    ) -> AppResult<Vec<audit_log::Model>> {
        let role = require_role(actor, AUDIT_ROLES)?;

        // Entries carry no tenant column; scope through the acting users.
        let user_ids = if role == Role::SuperAdmin {
            None
        } else {
            let tenant_users = self
                .user_repo
                .find_by_tenant(&actor.tenant_id, 10_000, 0)
                .await?;
            Some(tenant_users.into_iter().map(|u| u.id).collect())
        };

        let filter = AuditFilter {
            user_ids,
            action: input.action,
            entity_type: input.entity_type,
        };
        let limit = input.limit.unwrap_or(50).min(500);

        self.audit_repo
            .find_filtered(&filter, limit, input.skip)
            .await
    }
}
