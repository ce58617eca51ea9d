//! API middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use sceau_common::RevocationCache;
use sceau_core::{
    AuditService, AuthService, CampaignService, DiplomaService, TenantService, UserService,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub revocation_cache: Option<RevocationCache>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub tenant_service: TenantService,
    pub diploma_service: DiplomaService,
    pub campaign_service: CampaignService,
    pub audit_service: AuditService,
}

/// Authentication middleware.
///
/// Resolves the bearer token to an active user and stashes it in the
/// request extensions. Requests without a valid token pass through
/// untouched; the `AuthUser` extractor rejects them at protected
/// handlers, which leaves public routes free.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok((user, claims)) = state.auth_service.resolve(token).await
    {
        req.extensions_mut().insert(user);
        req.extensions_mut().insert(claims);
    }

    next.run(req).await
}

/// Error responses carry a 64 KiB envelope at most.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Stamps the request path into error envelopes.
///
/// Error bodies are produced by `AppError`, which has no view of the
/// request; this outer layer rewrites `{"error": {...}}` bodies to add
/// the `path` field. Non-error and non-envelope responses pass through
/// unchanged.
pub async fn error_envelope(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, ERROR_BODY_LIMIT).await else {
        return Response::from_parts(parts, Body::empty());
    };

    let stamped = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|mut value| {
            let envelope = value.get_mut("error")?.as_object_mut()?;
            envelope.insert("path".to_string(), serde_json::Value::String(path));
            Some(value.to_string())
        });

    match stamped {
        Some(json) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(json))
        }
        None => Response::from_parts(parts, Body::from(bytes)),
    }
}
