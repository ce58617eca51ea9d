//! Graduation campaigns, the organizational unit batches hang off.

use chrono::Utc;
use sceau_common::{AppError, AppResult, new_id};
use sceau_db::entities::{campaign, user};
use sceau_db::repositories::CampaignRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::access::{require_role, require_tenant, resolve_tenant};
use crate::roles::DIPLOMA_CREATE_ROLES;
use crate::services::audit::{AuditEvent, AuditService};
use crate::status::CampaignStatus;

/// Input for opening a campaign.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignInput {
    #[validate(range(min = 1990, max = 2100))]
    pub year: i32,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    pub start_date: Option<chrono::DateTime<Utc>>,
    /// Target tenant; SUPER_ADMIN only, defaults to the actor's.
    pub tenant_id: Option<String>,
}

/// Service managing campaigns.
#[derive(Clone)]
pub struct CampaignService {
    campaign_repo: CampaignRepository,
    audit: AuditService,
}

impl CampaignService {
    /// Create a new campaign service.
    #[must_use]
    pub const fn new(campaign_repo: CampaignRepository, audit: AuditService) -> Self {
        Self {
            campaign_repo,
            audit,
        }
    }

    /// Open a campaign.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateCampaignInput,
    ) -> AppResult<campaign::Model> {
        input.validate()?;
        require_role(actor, DIPLOMA_CREATE_ROLES)?;
        let tenant_id = resolve_tenant(actor, input.tenant_id.as_deref())?;

        let model = campaign::ActiveModel {
            id: Set(new_id()),
            tenant_id: Set(tenant_id),
            year: Set(input.year),
            name: Set(input.name),
            total_diplomas: Set(0),
            start_date: Set(input.start_date.map(Into::into)),
            status: Set(CampaignStatus::Open.as_str().to_string()),
            metadata_json: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.campaign_repo.create(model).await?;

        self.audit
            .record(AuditEvent::by(actor, "CAMPAIGN_CREATE", "campaign").entity(&created.id))
            .await;

        Ok(created)
    }

    /// List a tenant's campaigns, most recent year first.
    pub async fn list(
        &self,
        actor: &user::Model,
        tenant_id: Option<&str>,
    ) -> AppResult<Vec<campaign::Model>> {
        let tenant_id = resolve_tenant(actor, tenant_id)?;
        self.campaign_repo.find_by_tenant(&tenant_id).await
    }

    /// Freeze a campaign. Freezing an already frozen campaign is a no-op.
    pub async fn freeze(&self, actor: &user::Model, campaign_id: &str) -> AppResult<campaign::Model> {
        require_role(actor, DIPLOMA_CREATE_ROLES)?;

        let campaign = self.campaign_repo.get_by_id(campaign_id).await?;
        require_tenant(actor, &campaign.tenant_id)?;

        if campaign.status == CampaignStatus::Frozen.as_str() {
            return Ok(campaign);
        }
        if campaign.status == CampaignStatus::Closed.as_str() {
            return Err(AppError::BadRequest(
                "Cannot freeze a closed campaign".to_string(),
            ));
        }

        let mut active: campaign::ActiveModel = campaign.into();
        active.status = Set(CampaignStatus::Frozen.as_str().to_string());
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.campaign_repo.update(active).await?;

        self.audit
            .record(AuditEvent::by(actor, "CAMPAIGN_FREEZE", "campaign").entity(&updated.id))
            .await;

        Ok(updated)
    }
}
