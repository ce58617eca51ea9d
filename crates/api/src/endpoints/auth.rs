//! Authentication endpoints.

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use sceau_common::{AppResult, Claims};
use sceau_core::services::auth::{LoginInput, RequestContext, TokenPair};
use sceau_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, ClientInfo},
    middleware::AppState,
    response::ApiResponse,
};

/// User profile as returned by the API. Never carries the hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub tenant_id: String,
    pub status: String,
    pub official_title: Option<String>,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            tenant_id: u.tenant_id,
            status: u.status,
            official_title: u.official_title,
            last_login: u.last_login.map(|dt| dt.to_rfc3339()),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Login response: the token pair plus the user it belongs to.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserResponse,
}

/// Authenticate with email and password.
async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(req): Json<LoginInput>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let ctx = RequestContext {
        ip_address: client.ip_address,
        user_agent: client.user_agent,
    };
    let (tokens, user) = state.auth_service.login(req, &ctx).await?;

    Ok(ApiResponse::ok(LoginResponse {
        tokens,
        user: user.into(),
    }))
}

/// Refresh request, carried in the query string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(alias = "refresh_token")]
    pub refresh_token: String,
}

/// Exchange a refresh token for a fresh access token. The same
/// refresh token and the account summary come back with it.
async fn refresh(
    State(state): State<AppState>,
    Query(req): Query<RefreshRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (tokens, user) = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(ApiResponse::ok(LoginResponse {
        tokens,
        user: user.into(),
    }))
}

/// Revoke the current access token.
async fn logout(
    AuthUser(user): AuthUser,
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .auth_service
        .revoke(&user, &claims, "logout")
        .await?;
    Ok(ApiResponse::ok(
        serde_json::json!({ "message": "Logged out" }),
    ))
}

/// Current user profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
