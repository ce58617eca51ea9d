//! JWT issuing and validation.
//!
//! Tokens are HS256-signed. Access tokens carry the role and tenant of
//! the subject so middleware can resolve most requests without a
//! database round trip; refresh tokens carry only the subject and a
//! `jti` so they can be revoked individually.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::id::new_jti;

/// Token kind discriminator carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived API access token.
    Access,
    /// Long-lived refresh token.
    Refresh,
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email).
    pub sub: String,
    /// Role of the subject at issue time. Absent on refresh tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Tenant of the subject at issue time. Absent on refresh tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Unique token identifier, used for revocation.
    pub jti: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
    /// Token kind.
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Issues and validates HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the configured secret and lifetimes.
    #[must_use]
    pub fn new(secret: &str, access_token_minutes: i64, refresh_token_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_lifetime: Duration::minutes(access_token_minutes),
            refresh_lifetime: Duration::days(refresh_token_days),
        }
    }

    /// Issue an access token for a user.
    ///
    /// Returns the signed token and its claims.
    pub fn issue_access(
        &self,
        email: &str,
        role: &str,
        tenant_id: &str,
    ) -> Result<(String, Claims), AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            role: Some(role.to_string()),
            tenant_id: Some(tenant_id.to_string()),
            jti: new_jti(),
            iat: now.timestamp(),
            exp: (now + self.access_lifetime).timestamp(),
            token_type: TokenType::Access,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, claims))
    }

    /// Issue a refresh token for a user.
    pub fn issue_refresh(&self, email: &str) -> Result<(String, Claims), AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            role: None,
            tenant_id: None,
            jti: new_jti(),
            iat: now.timestamp(),
            exp: (now + self.refresh_lifetime).timestamp(),
            token_type: TokenType::Refresh,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, claims))
    }

    /// Validate a token signature and expiry and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Validate a token and require it to be of the given kind.
    pub fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.validate(token)?;
        if claims.token_type != expected {
            return Err(AppError::Unauthorized("Invalid token type".to_string()));
        }
        Ok(claims)
    }

    /// Access token lifetime in seconds, for login responses.
    #[must_use]
    pub fn access_lifetime_secs(&self) -> i64 {
        self.access_lifetime.num_seconds()
    }
}
