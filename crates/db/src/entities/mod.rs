//! Database entities.

pub mod audit_log;
pub mod campaign;
pub mod diploma;
pub mod revoked_token;
pub mod tenant;
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use campaign::Entity as Campaign;
pub use diploma::Entity as Diploma;
pub use revoked_token::Entity as RevokedToken;
pub use tenant::Entity as Tenant;
pub use user::Entity as User;
