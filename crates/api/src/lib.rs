//! HTTP API layer for sceau.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: authentication, tenants, users, diplomas,
//!   campaigns, audit trail, public verification
//! - **Extractors**: authenticated user and client metadata
//! - **Middleware**: bearer-token resolution, error envelope stamping
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware, error_envelope};
