//! Tenant management endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use sceau_common::AppResult;
use sceau_core::services::tenant::{
    CreateTenantInput, ListTenantsInput, TenantStats, UpdateTenantInput,
};
use sceau_db::entities::tenant;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Created},
};

/// Tenant as returned by the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub tenant_type: String,
    pub parent_id: Option<String>,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub max_users: i32,
    pub max_diplomas: i32,
    pub created_at: String,
}

impl From<tenant::Model> for TenantResponse {
    fn from(t: tenant::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
            description: t.description,
            tenant_type: t.tenant_type,
            parent_id: t.parent_id,
            logo_url: t.logo_url,
            contact_email: t.contact_email,
            contact_phone: t.contact_phone,
            status: t.status,
            is_active: t.is_active,
            max_users: t.max_users,
            max_diplomas: t.max_diplomas,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Create a tenant.
async fn create(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTenantInput>,
) -> AppResult<Created<TenantResponse>> {
    let tenant = state.tenant_service.create(&actor, req).await?;
    Ok(Created(tenant.into()))
}

/// List visible tenants.
async fn list(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Query(req): Query<ListTenantsInput>,
) -> AppResult<ApiResponse<Vec<TenantResponse>>> {
    let tenants = state.tenant_service.list(&actor, req).await?;
    Ok(ApiResponse::ok(
        tenants.into_iter().map(Into::into).collect(),
    ))
}

/// One tenant, tenant-guarded.
async fn show(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> AppResult<ApiResponse<TenantResponse>> {
    let tenant = state.tenant_service.get(&actor, &tenant_id).await?;
    Ok(ApiResponse::ok(tenant.into()))
}

/// Update a tenant.
async fn update(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(req): Json<UpdateTenantInput>,
) -> AppResult<ApiResponse<TenantResponse>> {
    let tenant = state.tenant_service.update(&actor, &tenant_id, req).await?;
    Ok(ApiResponse::ok(tenant.into()))
}

/// Soft-delete a tenant.
async fn remove(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> AppResult<ApiResponse<TenantResponse>> {
    let tenant = state.tenant_service.soft_delete(&actor, &tenant_id).await?;
    Ok(ApiResponse::ok(tenant.into()))
}

/// Effective settings: stored values layered over the defaults.
async fn settings(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let settings = state.tenant_service.settings(&actor, &tenant_id).await?;
    Ok(ApiResponse::ok(settings))
}

/// Merge a settings patch. A null value removes its key.
async fn update_settings(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let settings = state
        .tenant_service
        .update_settings(&actor, &tenant_id, patch)
        .await?;
    Ok(ApiResponse::ok(settings))
}

/// Diploma and user rollups for a tenant.
async fn stats(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> AppResult<ApiResponse<TenantStats>> {
    let stats = state.tenant_service.stats(&actor, &tenant_id).await?;
    Ok(ApiResponse::ok(stats))
}

/// Create the tenants router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{tenant_id}", get(show).patch(update).delete(remove))
        .route("/{tenant_id}/settings", get(settings).put(update_settings))
        .route("/{tenant_id}/stats", get(stats))
}
