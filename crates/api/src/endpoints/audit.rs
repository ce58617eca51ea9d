//! Audit trail endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use sceau_common::AppResult;
use sceau_core::services::audit::{AuditEvent, QueryAuditInput};
use sceau_db::entities::audit_log;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, ClientInfo},
    middleware::AppState,
    response::ApiResponse,
};

/// Audit entry as returned by the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: String,
    pub timestamp: String,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub hash: String,
}

impl From<audit_log::Model> for AuditLogResponse {
    fn from(e: audit_log::Model) -> Self {
        Self {
            id: e.id,
            timestamp: e.timestamp.to_rfc3339(),
            user_id: e.user_id,
            user_email: e.user_email,
            action: e.action,
            entity_type: e.entity_type,
            entity_id: e.entity_id,
            details: e.details,
            ip_address: e.ip_address,
            hash: e.hash,
        }
    }
}

/// Query the audit trail, tenant-scoped except for SUPER_ADMIN.
async fn query(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Query(req): Query<QueryAuditInput>,
) -> AppResult<ApiResponse<Vec<AuditLogResponse>>> {
    let entries = state.audit_service.query(&actor, req).await?;
    Ok(ApiResponse::ok(
        entries.into_iter().map(Into::into).collect(),
    ))
}

/// A verification attempt reported by the public portal.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerificationReport {
    diploma_id: Option<String>,
    result: Option<String>,
}

/// Record a public verification attempt. Unauthenticated, never fails.
async fn log_verification(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(report): Json<VerificationReport>,
) -> ApiResponse<serde_json::Value> {
    let mut event = AuditEvent::anonymous("PUBLIC_VERIFICATION", "diploma");
    event.entity_id = report.diploma_id;
    event.details = report.result;
    event.ip_address = client.ip_address;
    event.user_agent = client.user_agent;
    state.audit_service.record(event).await;

    ApiResponse::ok(serde_json::json!({ "message": "Recorded" }))
}

/// Create the audit router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(query))
        .route("/verification", post(log_verification))
}
