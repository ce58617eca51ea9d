//! API endpoints.

mod audit;
pub mod auth;
mod campaigns;
mod diplomas;
mod meta;
mod public;
mod tenants;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/tenants", tenants::router())
        .nest("/diplomas", diplomas::router())
        .nest("/campaigns", campaigns::router())
        .nest("/audit-logs", audit::router())
        .nest("/public", public::router())
        .nest("/health", meta::router())
}
