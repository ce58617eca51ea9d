//! Identity and token service.

use chrono::Utc;
use sceau_common::{
    AppError, AppResult, Claims, RevocationCache, TokenIssuer, TokenType, new_id,
};
use sceau_db::entities::{revoked_token, user};
use sceau_db::repositories::{RevokedTokenRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use crate::services::audit::{AuditEvent, AuditService};
use crate::status::USER_ACTIVE;

/// Login credentials.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request provenance attached to audit entries.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Source address.
    pub ip_address: Option<String>,
    /// User agent header.
    pub user_agent: Option<String>,
}

/// Issued token pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Hash a password with argon2id.
///
/// `fast` selects reduced cost parameters for development and tests.
pub fn hash_password(password: &str, fast: bool) -> AppResult<String> {
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
    use argon2::{Algorithm, Argon2, Params, Version};

    let argon2 = if fast {
        let params = Params::new(4096, 1, 1, None)
            .map_err(|e| AppError::Internal(format!("Invalid argon2 params: {e}")))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    use argon2::{Argon2, PasswordVerifier, password_hash::PasswordHash};

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Service for login, token refresh, resolution and revocation.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    revoked_repo: RevokedTokenRepository,
    issuer: TokenIssuer,
    cache: Option<RevocationCache>,
    audit: AuditService,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        revoked_repo: RevokedTokenRepository,
        issuer: TokenIssuer,
        cache: Option<RevocationCache>,
        audit: AuditService,
    ) -> Self {
        Self {
            user_repo,
            revoked_repo,
            issuer,
            cache,
            audit,
        }
    }

    /// Authenticate a user and issue a token pair.
    ///
    /// Every credential failure returns the same message so callers
    /// cannot distinguish unknown accounts from bad passwords.
    pub async fn login(
        &self,
        input: LoginInput,
        ctx: &RequestContext,
    ) -> AppResult<(TokenPair, user::Model)> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .filter(|u| u.status == USER_ACTIVE)
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            debug!(email = %input.email, "Password verification failed");
            return Err(invalid_credentials());
        }

        let (access_token, _) =
            self.issuer
                .issue_access(&user.email, &user.role, &user.tenant_id)?;
        let (refresh_token, _) = self.issuer.issue_refresh(&user.email)?;

        let mut active: user::ActiveModel = user.clone().into();
        active.last_login = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        let mut event = AuditEvent::by(&user, "LOGIN_SUCCESS", "user").entity(&user.id);
        event.ip_address.clone_from(&ctx.ip_address);
        event.user_agent.clone_from(&ctx.user_agent);
        self.audit.record(event).await;

        Ok((
            TokenPair {
                access_token,
                refresh_token,
                token_type: "bearer".to_string(),
                expires_in: self.issuer.access_lifetime_secs(),
            },
            user,
        ))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token is returned unchanged, not rotated. The
    /// resolved account rides along so callers can echo the user
    /// summary with the fresh pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<(TokenPair, user::Model)> {
        let claims = self
            .issuer
            .validate_typed(refresh_token, TokenType::Refresh)?;

        if self.is_revoked(&claims.jti).await? {
            return Err(AppError::Unauthorized("Token has been revoked".to_string()));
        }

        let user = self
            .user_repo
            .find_by_email(&claims.sub)
            .await?
            .filter(|u| u.status == USER_ACTIVE)
            .ok_or_else(|| AppError::Unauthorized("Account is not active".to_string()))?;

        let (access_token, _) =
            self.issuer
                .issue_access(&user.email, &user.role, &user.tenant_id)?;

        Ok((
            TokenPair {
                access_token,
                refresh_token: refresh_token.to_string(),
                token_type: "bearer".to_string(),
                expires_in: self.issuer.access_lifetime_secs(),
            },
            user,
        ))
    }

    /// Resolve an access token to its user.
    ///
    /// All failure modes collapse to `Unauthorized`; the specific cause
    /// is only visible in logs.
    pub async fn resolve(&self, token: &str) -> AppResult<(user::Model, Claims)> {
        let claims = self.issuer.validate_typed(token, TokenType::Access)?;

        if self.is_revoked(&claims.jti).await? {
            debug!(jti = %claims.jti, "Rejected revoked token");
            return Err(AppError::Unauthorized("Token has been revoked".to_string()));
        }

        let user = self
            .user_repo
            .find_by_email(&claims.sub)
            .await?
            .filter(|u| u.status == USER_ACTIVE)
            .ok_or_else(|| AppError::Unauthorized("Account is not active".to_string()))?;

        Ok((user, claims))
    }

    /// Revoke a token. The ledger row is authoritative; the cache entry
    /// is best effort.
    pub async fn revoke(
        &self,
        actor: &user::Model,
        claims: &Claims,
        reason: &str,
    ) -> AppResult<()> {
        let now = Utc::now();
        let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
            .unwrap_or(now);

        let model = revoked_token::ActiveModel {
            id: Set(new_id()),
            jti: Set(claims.jti.clone()),
            user_id: Set(Some(actor.id.clone())),
            reason: Set(Some(reason.to_string())),
            revoked_at: Set(now.into()),
            expires_at: Set(expires_at.into()),
        };
        self.revoked_repo.create(model).await?;

        if let Some(cache) = &self.cache {
            let remaining = (expires_at - now).num_seconds();
            if let Err(e) = cache.mark_revoked(&claims.jti, remaining).await {
                warn!(jti = %claims.jti, error = %e, "Failed to cache revocation");
            }
        }

        self.audit
            .record(AuditEvent::by(actor, "LOGOUT", "user").entity(&actor.id))
            .await;

        Ok(())
    }

    /// Revocation check: cache first, ledger table on miss or cache
    /// failure.
    async fn is_revoked(&self, jti: &str) -> AppResult<bool> {
        if let Some(cache) = &self.cache {
            match cache.is_revoked(jti).await {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Revocation cache unavailable, using database"),
            }
        }
        self.revoked_repo.is_revoked(jti).await
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret-that-is-long-enough", 480, 7)
    }

    fn test_user(password_hash: &str) -> user::Model {
        user::Model {
            id: "user-1".to_string(),
            email: "rector@uni.test".to_string(),
            full_name: "Rector".to_string(),
            password_hash: password_hash.to_string(),
            role: "RECTOR".to_string(),
            tenant_id: "tenant-1".to_string(),
            status: "ACTIVE".to_string(),
            last_login: None,
            signature_img: None,
            stamp_img: None,
            official_title: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> AuthService {
        AuthService::new(
            UserRepository::new(db.clone()),
            RevokedTokenRepository::new(db.clone()),
            issuer(),
            None,
            AuditService::new(
                sceau_db::repositories::AuditLogRepository::new(db.clone()),
                UserRepository::new(db),
            ),
        )
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("s3cret-enough", true).unwrap();
        assert!(verify_password("s3cret-enough", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let hash = hash_password("right-password", true).unwrap();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user(&hash)]])
                .into_connection(),
        );

        let result = service(db)
            .login(
                LoginInput {
                    email: "rector@uni.test".to_string(),
                    password: "wrong-password".to_string(),
                },
                &RequestContext::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_user_same_message() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let err = service(db)
            .login(
                LoginInput {
                    email: "ghost@uni.test".to_string(),
                    password: "whatever".to_string(),
                },
                &RequestContext::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid email or password"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_refresh_token() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = service(db);

        let (refresh, _) = issuer().issue_refresh("rector@uni.test").unwrap();
        let result = svc.resolve(&refresh).await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_revoked_token() {
        let (token, claims) = issuer()
            .issue_access("rector@uni.test", "RECTOR", "tenant-1")
            .unwrap();

        let revoked = revoked_token::Model {
            id: "r1".to_string(),
            jti: claims.jti,
            user_id: Some("user-1".to_string()),
            reason: Some("logout".to_string()),
            revoked_at: Utc::now().into(),
            expires_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[revoked]])
                .into_connection(),
        );

        let result = service(db).resolve(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_resolve_ok_path() {
        let hash = hash_password("pw", true).unwrap();
        let (token, _) = issuer()
            .issue_access("rector@uni.test", "RECTOR", "tenant-1")
            .unwrap();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<revoked_token::Model>::new()])
                .append_query_results([[test_user(&hash)]])
                .into_connection(),
        );

        let (user, claims) = service(db).resolve(&token).await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(claims.sub, "rector@uni.test");
    }
}
