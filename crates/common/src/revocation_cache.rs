//! Token revocation caching with Redis.
//!
//! Revoked token identifiers are written to Redis with a TTL matching
//! the remaining token lifetime, so the hot path of request
//! authentication can reject revoked tokens without a database query.
//! The persistent `revoked_tokens` table remains the source of truth;
//! callers fall back to it when the cache is unavailable or misses.

use fred::clients::Client as RedisClient;
use fred::interfaces::{ClientLike, KeysInterface};
use fred::types::{ClientState, Expiration};
use std::sync::Arc;
use tracing::{debug, info};

/// Floor for cache entry TTLs, in case a token is revoked moments
/// before its natural expiry.
const MIN_REVOCATION_TTL_SECS: i64 = 60;

/// Revoked token cache using Redis.
#[derive(Clone)]
pub struct RevocationCache {
    redis: Arc<RedisClient>,
}

impl RevocationCache {
    /// Create a new revocation cache.
    #[must_use]
    pub const fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    /// Whether the underlying Redis connection is currently up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.redis.state() == ClientState::Connected
    }

    /// Generate cache key for a token identifier.
    fn revoked_key(jti: &str) -> String {
        format!("revoked_token:{jti}")
    }

    /// Check whether a token identifier is marked revoked.
    ///
    /// Returns `Ok(true)` if the jti is in the cache. A miss does not
    /// prove the token is live; callers consult the persistent store.
    pub async fn is_revoked(&self, jti: &str) -> Result<bool, RevocationCacheError> {
        let key = Self::revoked_key(jti);

        let exists: i64 = self
            .redis
            .exists(key)
            .await
            .map_err(|e| RevocationCacheError::Redis(e.to_string()))?;

        if exists > 0 {
            debug!(jti = %jti, "Token found in revocation cache");
        }

        Ok(exists > 0)
    }

    /// Mark a token identifier as revoked.
    ///
    /// The entry expires once the token itself would have expired, so
    /// the cache never grows beyond the set of still-valid tokens.
    pub async fn mark_revoked(
        &self,
        jti: &str,
        remaining_secs: i64,
    ) -> Result<(), RevocationCacheError> {
        let key = Self::revoked_key(jti);
        let ttl = remaining_secs.max(MIN_REVOCATION_TTL_SECS);

        self.redis
            .set::<(), _, _>(key, "1", Some(Expiration::EX(ttl)), None, false)
            .await
            .map_err(|e| RevocationCacheError::Redis(e.to_string()))?;

        info!(jti = %jti, ttl_secs = ttl, "Marked token as revoked");

        Ok(())
    }
}

/// Revocation cache error type.
#[derive(Debug, thiserror::Error)]
pub enum RevocationCacheError {
    /// Redis operation failed.
    #[error("Redis error: {0}")]
    Redis(String),
}
