//! Diploma lifecycle endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use sceau_common::AppResult;
use sceau_core::services::diploma::{
    BatchCreateInput, BatchOutcome, ImportOutcome, ListDiplomasInput, SignInput, SignOutcome,
    StudentRow,
};
use sceau_db::entities::diploma;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Created},
};

/// Diploma as returned by the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomaResponse {
    pub id: String,
    pub student_matricule: String,
    pub student_name: String,
    pub program: String,
    pub session: String,
    pub academic_level: Option<String>,
    pub tenant_id: String,
    pub status: String,
    pub blockchain_tx_id: Option<String>,
    pub blockchain_anchored_at: Option<String>,
    pub issued_at: String,
}

impl From<diploma::Model> for DiplomaResponse {
    fn from(d: diploma::Model) -> Self {
        Self {
            id: d.id,
            student_matricule: d.student_matricule,
            student_name: d.student_name,
            program: d.program,
            session: d.session,
            academic_level: d.academic_level,
            tenant_id: d.tenant_id,
            status: d.status,
            blockchain_tx_id: d.blockchain_tx_id,
            blockchain_anchored_at: d.blockchain_anchored_at.map(|dt| dt.to_rfc3339()),
            issued_at: d.issued_at.to_rfc3339(),
        }
    }
}

/// Mapped import request: spreadsheet rows already normalized by the
/// client from its column mapping.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMappedRequest {
    pub campaign_id: Option<String>,
    pub tenant_id: Option<String>,
    pub rows: Vec<StudentRow>,
}

/// Single-diploma request: a student row plus an optional target
/// tenant for SUPER_ADMIN callers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiplomaRequest {
    #[serde(flatten)]
    pub student: StudentRow,
    pub tenant_id: Option<String>,
}

/// Create a single DRAFT diploma.
async fn create(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateDiplomaRequest>,
) -> AppResult<Created<DiplomaResponse>> {
    let diploma = state
        .diploma_service
        .create(&actor, req.student, req.tenant_id.as_deref())
        .await?;
    Ok(Created(diploma.into()))
}

/// Create a batch of VALIDATED diplomas.
async fn create_batch(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BatchCreateInput>,
) -> AppResult<ApiResponse<BatchOutcome>> {
    let outcome = state.diploma_service.create_batch(&actor, req).await?;
    Ok(ApiResponse::ok(outcome))
}

/// Import mapped spreadsheet rows as DRAFT diplomas.
async fn import_mapped(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ImportMappedRequest>,
) -> AppResult<ApiResponse<ImportOutcome>> {
    let outcome = state
        .diploma_service
        .import_mapped(&actor, req.campaign_id, req.rows, req.tenant_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(outcome))
}

/// List the caller's tenant diplomas.
async fn list(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Query(req): Query<ListDiplomasInput>,
) -> AppResult<ApiResponse<Vec<DiplomaResponse>>> {
    let diplomas = state.diploma_service.list(&actor, req).await?;
    Ok(ApiResponse::ok(
        diplomas.into_iter().map(Into::into).collect(),
    ))
}

/// Diplomas awaiting the caller's signature.
async fn pending(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
) -> ApiResponse<Vec<DiplomaResponse>> {
    let diplomas = state.diploma_service.pending_for_signer(&actor).await;
    ApiResponse::ok(diplomas.into_iter().map(Into::into).collect())
}

/// One diploma, tenant-guarded.
async fn show(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(diploma_id): Path<String>,
) -> AppResult<ApiResponse<DiplomaResponse>> {
    let diploma = state.diploma_service.get(&actor, &diploma_id).await?;
    Ok(ApiResponse::ok(diploma.into()))
}

/// Apply the caller's signature. The body is optional; it can carry
/// presentation overrides for the signature entry.
async fn sign(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(diploma_id): Path<String>,
    body: Option<Json<SignInput>>,
) -> AppResult<ApiResponse<SignOutcome>> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let outcome = state.diploma_service.sign(&actor, &diploma_id, input).await?;
    Ok(ApiResponse::ok(outcome))
}

/// Anchor a fully signed diploma.
async fn anchor(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(diploma_id): Path<String>,
) -> AppResult<ApiResponse<DiplomaResponse>> {
    let diploma = state.diploma_service.anchor(&actor, &diploma_id).await?;
    Ok(ApiResponse::ok(diploma.into()))
}

/// Create the diplomas router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/batch", post(create_batch))
        .route("/import-mapped", post(import_mapped))
        .route("/pending-signature", get(pending))
        .route("/{diploma_id}", get(show))
        .route("/{diploma_id}/sign", post(sign))
        .route("/{diploma_id}/anchor", post(anchor))
}
