//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Deployment environment.
///
/// Production tightens security defaults: full argon2 cost, suppressed
/// internal error detail, mandatory JWT secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (cheaper password hashing, verbose errors).
    #[default]
    Development,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// First-boot seeding configuration.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait when opening a connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Seconds to wait when checking a connection out of the pool.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Seconds an idle connection is kept before being closed.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a pooled connection, in seconds.
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
}

/// Redis configuration.
///
/// Redis is optional: when `url` is empty or unreachable the revocation
/// ledger falls back to the persistent store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL. Empty disables the cache.
    #[serde(default)]
    pub url: String,
    /// Key prefix for all Redis keys.
    #[serde(default = "default_redis_prefix")]
    pub prefix: String,
}

impl RedisConfig {
    /// Whether a Redis cache is configured.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for JWTs.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
}

/// First-boot seeding configuration (default tenant and administrator).
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Name of the default tenant.
    #[serde(default = "default_seed_tenant_name")]
    pub tenant_name: String,
    /// Slug of the default tenant.
    #[serde(default = "default_seed_tenant_slug")]
    pub tenant_slug: String,
    /// Email of the default administrator.
    #[serde(default = "default_seed_admin_email")]
    pub admin_email: String,
    /// Initial password of the default administrator.
    #[serde(default = "default_seed_admin_password")]
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            tenant_name: default_seed_tenant_name(),
            tenant_slug: default_seed_tenant_slug(),
            admin_email: default_seed_admin_email(),
            admin_password: default_seed_admin_password(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_acquire_timeout_secs() -> u64 {
    10
}

const fn default_idle_timeout_secs() -> u64 {
    600
}

const fn default_max_lifetime_secs() -> u64 {
    1800
}

fn default_redis_prefix() -> String {
    "sceau".to_string()
}

const fn default_access_token_minutes() -> i64 {
    480
}

const fn default_refresh_token_days() -> i64 {
    7
}

fn default_seed_tenant_name() -> String {
    "Default Ministry".to_string()
}

fn default_seed_tenant_slug() -> String {
    "default-ministry".to_string()
}

fn default_seed_admin_email() -> String {
    "admin@sceau.local".to_string()
}

fn default_seed_admin_password() -> String {
    "change-me-on-first-login".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `SCEAU_ENV`)
    /// 3. Environment variables with `SCEAU_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("SCEAU_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SCEAU")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;

        // Refuse to start in production with the placeholder secret.
        if config.environment.is_production() && config.auth.jwt_secret.len() < 32 {
            return Err(config::ConfigError::Message(
                "auth.jwt_secret must be at least 32 bytes in production".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SCEAU")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
        assert!(!Environment::Development.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_database_config_pool_defaults() {
        let cfg: DatabaseConfig =
            serde_json::from_str(r#"{"url":"postgres://localhost/sceau"}"#).unwrap();

        assert_eq!(cfg.connect_timeout_secs, 10);
        assert_eq!(cfg.acquire_timeout_secs, 10);
        assert_eq!(cfg.idle_timeout_secs, 600);
        assert_eq!(cfg.max_lifetime_secs, 1800);
    }

    #[test]
    fn test_redis_config_enabled() {
        let disabled = RedisConfig::default();
        assert!(!disabled.enabled());

        let enabled = RedisConfig {
            url: "redis://localhost:6379/0".to_string(),
            prefix: "sceau".to_string(),
        };
        assert!(enabled.enabled());
    }
}
