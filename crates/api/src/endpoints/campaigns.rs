//! Campaign endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::post,
};
use sceau_common::AppResult;
use sceau_core::services::campaign::CreateCampaignInput;
use sceau_db::entities::campaign;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Created},
};

/// Campaign as returned by the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: String,
    pub tenant_id: String,
    pub year: i32,
    pub name: String,
    pub total_diplomas: i32,
    pub start_date: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<campaign::Model> for CampaignResponse {
    fn from(c: campaign::Model) -> Self {
        Self {
            id: c.id,
            tenant_id: c.tenant_id,
            year: c.year,
            name: c.name,
            total_diplomas: c.total_diplomas,
            start_date: c.start_date.map(|dt| dt.to_rfc3339()),
            status: c.status,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Open a campaign.
async fn create(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCampaignInput>,
) -> AppResult<Created<CampaignResponse>> {
    let campaign = state.campaign_service.create(&actor, req).await?;
    Ok(Created(campaign.into()))
}

/// List campaigns request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsRequest {
    /// Tenant to list. Defaults to the caller's own tenant.
    pub tenant_id: Option<String>,
}

/// List a tenant's campaigns.
async fn list(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Query(req): Query<ListCampaignsRequest>,
) -> AppResult<ApiResponse<Vec<CampaignResponse>>> {
    let campaigns = state
        .campaign_service
        .list(&actor, req.tenant_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(
        campaigns.into_iter().map(Into::into).collect(),
    ))
}

/// Freeze a campaign.
async fn freeze(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> AppResult<ApiResponse<CampaignResponse>> {
    let campaign = state.campaign_service.freeze(&actor, &campaign_id).await?;
    Ok(ApiResponse::ok(campaign.into()))
}

/// Create the campaigns router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{campaign_id}/freeze", post(freeze))
}
