//! Identifier generation.
//!
//! Row identifiers are random UUIDs. Diploma identifiers are
//! content-derived hex digests so that two imports of the same record
//! at different times never collide and the identifier carries no
//! guessable structure.

use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a random row identifier.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a JWT identifier (jti claim).
#[must_use]
pub fn new_jti() -> String {
    Uuid::new_v4().to_string()
}

/// Derive a diploma identifier from its matricule and tenant.
///
/// The digest mixes the issue time and a random nonce so repeated
/// calls with the same inputs produce distinct identifiers.
#[must_use]
pub fn new_diploma_id(matricule: &str, tenant_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(matricule.as_bytes());
    hasher.update(tenant_id.as_bytes());
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive a simulated ledger transaction identifier for a diploma.
#[must_use]
pub fn new_transaction_id(diploma_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(diploma_id.as_bytes());
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("0x{digest}")
}

/// Fingerprint an audit event for tamper evidence.
#[must_use]
pub fn audit_fingerprint(user_id: &str, action: &str, entity_type: &str, entity_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(action.as_bytes());
    hasher.update(entity_type.as_bytes());
    hasher.update(entity_id.as_bytes());
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_uuid() {
        let id = new_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_diploma_id_is_unique_per_call() {
        let a = new_diploma_id("MAT-001", "tenant-1");
        let b = new_diploma_id("MAT-001", "tenant-1");
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_transaction_id_shape() {
        let tx = new_transaction_id("abc123");
        assert!(tx.starts_with("0x"));
        assert_eq!(tx.len(), 66);
    }

    #[test]
    fn test_audit_fingerprint_is_hex_digest() {
        let fp = audit_fingerprint("u1", "diploma.sign", "diploma", "d1");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
