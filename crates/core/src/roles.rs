//! User roles.

use std::fmt;
use std::str::FromStr;

use sceau_common::AppError;
use serde::{Deserialize, Serialize};

/// Role held by a user within their tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Cross-tenant administrator.
    SuperAdmin,
    /// Tenant administrator.
    Admin,
    /// University rector.
    Rector,
    /// Faculty dean.
    Dean,
    /// Institute director.
    Director,
    /// Dedicated signer account.
    Signer,
    /// Record validator.
    Validator,
    /// Read-only account.
    Viewer,
}

/// Roles allowed to create diploma records.
pub const DIPLOMA_CREATE_ROLES: &[Role] = &[
    Role::Admin,
    Role::SuperAdmin,
    Role::Validator,
    Role::Rector,
    Role::Dean,
    Role::Director,
];

/// Roles allowed to sign diplomas.
pub const DIPLOMA_SIGN_ROLES: &[Role] = &[
    Role::Admin,
    Role::Signer,
    Role::SuperAdmin,
    Role::Rector,
    Role::Dean,
    Role::Director,
];

/// Roles allowed to read the audit trail.
pub const AUDIT_ROLES: &[Role] = &[Role::Admin, Role::SuperAdmin];

impl Role {
    /// The stored string form of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Rector => "RECTOR",
            Self::Dean => "DEAN",
            Self::Director => "DIRECTOR",
            Self::Signer => "SIGNER",
            Self::Validator => "VALIDATOR",
            Self::Viewer => "VIEWER",
        }
    }

    /// Whether holders of this role can apply signatures.
    #[must_use]
    pub fn can_sign(self) -> bool {
        DIPLOMA_SIGN_ROLES.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "RECTOR" => Ok(Self::Rector),
            "DEAN" => Ok(Self::Dean),
            "DIRECTOR" => Ok(Self::Director),
            "SIGNER" => Ok(Self::Signer),
            "VALIDATOR" => Ok(Self::Validator),
            "VIEWER" => Ok(Self::Viewer),
            other => Err(AppError::BadRequest(format!("Unknown role: {other}"))),
        }
    }
}
