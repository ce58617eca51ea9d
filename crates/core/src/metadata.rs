//! Typed views over the diploma metadata document.
//!
//! `metadata_json` is stored opaquely in the database. These types give
//! the lifecycle engine a structured handle on the keys it owns while
//! preserving any keys written by other producers (imports, older
//! versions) unchanged through the flattened `extra` map.

use chrono::{DateTime, Utc};
use sceau_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One applied signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    /// Signer's user id.
    pub signer_id: String,
    /// Signer's display name at signing time.
    #[serde(default)]
    pub signer_name: String,
    /// Signer's email at signing time.
    pub signer_email: String,
    /// Signer's role at signing time.
    pub role: String,
    /// Title printed with the signature, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_title: Option<String>,
    /// Signature image, as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_img: Option<String>,
    /// Stamp image, as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_img: Option<String>,
    /// When the signature was applied.
    pub signed_at: DateTime<Utc>,
}

/// A lifecycle breadcrumb embedded in the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditBreadcrumb {
    /// Action name (e.g. `DIPLOMA_SIGN`).
    pub action: String,
    /// Acting user id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
}

/// Receipt returned by the anchoring ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorReceipt {
    /// Ledger transaction identifier.
    pub transaction_id: String,
    /// Ledger network name.
    pub network: String,
    /// Block the transaction landed in.
    pub block_number: u64,
    /// Hash of the anchored content.
    pub content_hash: String,
    /// Transaction status as reported by the ledger.
    pub status: String,
    /// When the anchor was confirmed.
    pub anchored_at: DateTime<Utc>,
}

/// Structured view of `metadata_json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomaMetadata {
    /// Applied signatures, in application order.
    #[serde(default)]
    pub signatures: Vec<SignatureRecord>,
    /// Lifecycle breadcrumbs.
    #[serde(default)]
    pub audit_chain: Vec<AuditBreadcrumb>,
    /// Anchor receipt, present once anchored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorReceipt>,
    /// Keys this engine does not own, preserved round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DiplomaMetadata {
    /// Parse the stored document. Absent or malformed input yields an
    /// empty document; malformed input is logged, not propagated.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(json) => serde_json::from_str(json).unwrap_or_else(|e| {
                warn!(error = %e, "Unreadable diploma metadata, starting fresh");
                Self::default()
            }),
        }
    }

    /// Serialize back to the stored form.
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self)
            .map_err(|e| AppError::Internal(format!("Failed to serialize metadata: {e}")))
    }

    /// Whether the given user has already signed.
    #[must_use]
    pub fn has_signature_from(&self, user_id: &str) -> bool {
        self.signatures.iter().any(|s| s.signer_id == user_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_none_is_empty() {
        let meta = DiplomaMetadata::parse(None);
        assert!(meta.signatures.is_empty());
        assert!(meta.anchor.is_none());
    }

    #[test]
    fn test_parse_malformed_is_empty() {
        let meta = DiplomaMetadata::parse(Some("{not json"));
        assert!(meta.signatures.is_empty());
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let raw = r#"{"signatures":[],"promotionId":"promo-7","source":"excel_import"}"#;
        let meta = DiplomaMetadata::parse(Some(raw));

        assert_eq!(
            meta.extra.get("promotionId").and_then(|v| v.as_str()),
            Some("promo-7")
        );

        let round = meta.to_json().unwrap();
        let reparsed = DiplomaMetadata::parse(Some(&round));
        assert_eq!(
            reparsed.extra.get("source").and_then(|v| v.as_str()),
            Some("excel_import")
        );
    }

    #[test]
    fn test_parse_record_without_images_or_name() {
        let raw = r#"{"signatures":[{"signerId":"u-1","signerEmail":"dean@uni.test","role":"DEAN","signedAt":"2026-01-10T08:00:00Z"}]}"#;
        let meta = DiplomaMetadata::parse(Some(raw));

        assert_eq!(meta.signatures.len(), 1);
        assert_eq!(meta.signatures[0].signer_name, "");
        assert!(meta.signatures[0].signature_img.is_none());
    }

    #[test]
    fn test_has_signature_from() {
        let mut meta = DiplomaMetadata::default();
        meta.signatures.push(SignatureRecord {
            signer_id: "user-1".to_string(),
            signer_name: "Recteur Test".to_string(),
            signer_email: "rector@uni.test".to_string(),
            role: "RECTOR".to_string(),
            official_title: None,
            signature_img: None,
            stamp_img: None,
            signed_at: Utc::now(),
        });

        assert!(meta.has_signature_from("user-1"));
        assert!(!meta.has_signature_from("user-2"));
    }
}
