//! Lifecycle statuses.

use std::fmt;
use std::str::FromStr;

use sceau_common::AppError;
use serde::{Deserialize, Serialize};

/// Diploma lifecycle status.
///
/// The only forward transitions are DRAFT -> VALIDATED ->
/// PARTIALLY_SIGNED -> SIGNED; CANCELLED is terminal from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiplomaStatus {
    Draft,
    Validated,
    PartiallySigned,
    Signed,
    Cancelled,
}

impl DiplomaStatus {
    /// The stored string form of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Validated => "VALIDATED",
            Self::PartiallySigned => "PARTIALLY_SIGNED",
            Self::Signed => "SIGNED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for DiplomaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiplomaStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "VALIDATED" => Ok(Self::Validated),
            "PARTIALLY_SIGNED" => Ok(Self::PartiallySigned),
            "SIGNED" => Ok(Self::Signed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(AppError::Internal(format!(
                "Unknown diploma status: {other}"
            ))),
        }
    }
}

/// Campaign lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Open,
    Frozen,
    Closed,
}

impl CampaignStatus {
    /// The stored string form of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Frozen => "FROZEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account status. Stored as plain strings.
pub const USER_ACTIVE: &str = "ACTIVE";
/// Deactivated user account status.
pub const USER_INACTIVE: &str = "INACTIVE";

/// Active tenant status.
pub const TENANT_ACTIVE: &str = "ACTIVE";
/// Soft-deleted tenant status.
pub const TENANT_INACTIVE: &str = "INACTIVE";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_diploma_status_round_trip() {
        for status in [
            DiplomaStatus::Draft,
            DiplomaStatus::Validated,
            DiplomaStatus::PartiallySigned,
            DiplomaStatus::Signed,
            DiplomaStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<DiplomaStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_internal_error() {
        let err = "SHREDDED".parse::<DiplomaStatus>().unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
