//! Unauthenticated verification endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use sceau_common::AppResult;
use sceau_core::services::diploma::VerificationView;

use crate::{middleware::AppState, response::ApiResponse};

/// Verify a diploma by identifier. No authentication, no tenant data.
async fn verify(
    State(state): State<AppState>,
    Path(diploma_id): Path<String>,
) -> AppResult<ApiResponse<VerificationView>> {
    let view = state.diploma_service.verify_public(&diploma_id).await?;
    Ok(ApiResponse::ok(view))
}

/// Create the public router.
pub fn router() -> Router<AppState> {
    Router::new().route("/verify/{diploma_id}", get(verify))
}
