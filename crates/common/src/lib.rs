//! Common utilities and shared types for sceau.
//!
//! This crate provides foundational components used across all sceau crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Random and content-derived identifiers
//! - **Tokens**: HS256 JWT issuing and validation via [`TokenIssuer`]
//! - **Revocation Cache**: Redis-backed revoked-token lookups
//!
//! # Example
//!
//! ```no_run
//! use sceau_common::{Config, AppResult, TokenIssuer};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let issuer = TokenIssuer::new(
//!         &config.auth.jwt_secret,
//!         config.auth.access_token_minutes,
//!         config.auth.refresh_token_days,
//!     );
//!     let (token, _claims) = issuer.issue_access("admin@sceau.local", "ADMIN", "tenant-1")?;
//!     println!("Issued token: {token}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod revocation_cache;
pub mod token;

pub use config::{Config, Environment, SeedConfig};
pub use error::{AppError, AppResult};
pub use id::{audit_fingerprint, new_diploma_id, new_id, new_jti, new_transaction_id};
pub use revocation_cache::{RevocationCache, RevocationCacheError};
pub use token::{Claims, TokenIssuer, TokenType};
