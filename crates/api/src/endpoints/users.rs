//! User management endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};
use sceau_common::AppResult;
use sceau_core::services::user::{
    CreateUserInput, SignatureSetupInput, SignerView, UpdateProfileInput, UpdateUserInput,
};
use serde::Deserialize;

use crate::{
    endpoints::auth::UserResponse, extractors::AuthUser, middleware::AppState,
    response::{ApiResponse, Created},
};

/// List users request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    /// Tenant to list. Defaults to the caller's own tenant.
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    50
}

/// Create a user.
async fn create(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateUserInput>,
) -> AppResult<Created<UserResponse>> {
    let user = state.user_service.create(&actor, req).await?;
    Ok(Created(user.into()))
}

/// List a tenant's users.
async fn list(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Query(req): Query<ListUsersRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let tenant_id = req.tenant_id.unwrap_or_else(|| actor.tenant_id.clone());
    let users = state
        .user_service
        .list(&actor, &tenant_id, req.skip, req.limit)
        .await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Eligible signers in the caller's tenant.
async fn signers(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<SignerView>>> {
    let signers = state.user_service.signers(&actor).await?;
    Ok(ApiResponse::ok(signers))
}

/// One user, tenant-guarded.
async fn show(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&actor, &user_id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Update the caller's own profile.
async fn update_profile(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.update_profile(&actor, req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Store the caller's signature and stamp images.
async fn setup_signature(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SignatureSetupInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.setup_signature(&actor, req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Administrative update of another user's account.
async fn update(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.update(&actor, &user_id, req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Flip a user between ACTIVE and INACTIVE.
async fn toggle_status(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.toggle_status(&actor, &user_id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/signers", get(signers))
        .route("/me/profile", patch(update_profile))
        .route("/me/signature", put(setup_signature))
        .route("/{user_id}", get(show).put(update))
        .route("/{user_id}/toggle-status", post(toggle_status))
}
