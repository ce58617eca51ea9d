//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use sceau_common::AppError;
use sceau_db::entities::user;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when a valid bearer token is present
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
    }
}

/// Client network metadata, recorded alongside audited actions.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Best-effort client address.
    pub ip_address: Option<String>,
    /// User-Agent header, when present.
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());
        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        Ok(Self {
            ip_address,
            user_agent,
        })
    }
}
