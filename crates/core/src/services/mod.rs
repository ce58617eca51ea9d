//! Business logic services.

pub mod anchor;
pub mod audit;
pub mod auth;
pub mod bootstrap;
pub mod campaign;
pub mod diploma;
pub mod tenant;
pub mod user;

pub use anchor::{AnchorLedger, SimulatedLedger};
pub use audit::{AuditEvent, AuditService, QueryAuditInput};
pub use auth::{AuthService, LoginInput, RequestContext, TokenPair};
pub use bootstrap::BootstrapService;
pub use campaign::{CampaignService, CreateCampaignInput};
pub use diploma::{
    BatchCreateInput, BatchOutcome, DiplomaService, ImportOutcome, ListDiplomasInput, RowError,
    SIGNATURE_QUORUM, SignOutcome, SignStatus, StudentRow, VerificationView,
};
pub use tenant::{
    CreateTenantInput, ListTenantsInput, TenantService, TenantStats, UpdateTenantInput,
};
pub use user::{
    CreateUserInput, SignatureSetupInput, SignerView, UpdateProfileInput, UserService,
};
