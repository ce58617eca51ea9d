//! Database repositories.

pub mod audit_log;
pub mod campaign;
pub mod diploma;
pub mod revoked_token;
pub mod tenant;
pub mod user;

pub use audit_log::{AuditFilter, AuditLogRepository};
pub use campaign::CampaignRepository;
pub use diploma::{DiplomaFilter, DiplomaRepository};
pub use revoked_token::RevokedTokenRepository;
pub use tenant::{TenantFilter, TenantRepository};
pub use user::UserRepository;
