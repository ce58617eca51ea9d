//! Sceau server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use fred::interfaces::ClientLike;
use sceau_api::{AppState, auth_middleware, error_envelope, router as api_router};
use sceau_common::{Config, RevocationCache, TokenIssuer};
use sceau_core::{
    AuditService, AuthService, BootstrapService, CampaignService, DiplomaService, SimulatedLedger,
    TenantService, UserService,
};
use sceau_db::repositories::{
    AuditLogRepository, CampaignRepository, DiplomaRepository, RevokedTokenRepository,
    TenantRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Connect the revocation cache, or run without it.
async fn connect_revocation_cache(config: &Config) -> Option<RevocationCache> {
    if !config.redis.enabled() {
        info!("Redis not configured, revocation checks use the database only");
        return None;
    }

    let fred_config = match fred::types::config::Config::from_url(&config.redis.url) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Invalid Redis URL, revocation cache disabled");
            return None;
        }
    };
    let client = fred::clients::Client::new(fred_config, None, None, None);
    client.connect();
    if let Err(e) = client.wait_for_connect().await {
        warn!(error = %e, "Redis unreachable, revocation cache disabled");
        return None;
    }

    info!("Connected to Redis revocation cache");
    Some(RevocationCache::new(Arc::new(client)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sceau=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting sceau server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = sceau_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    sceau_db::migrate(&db).await?;
    info!("Migrations completed");

    let revocation_cache = connect_revocation_cache(&config).await;

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let tenant_repo = TenantRepository::new(Arc::clone(&db));
    let diploma_repo = DiplomaRepository::new(Arc::clone(&db));
    let audit_repo = AuditLogRepository::new(Arc::clone(&db));
    let revoked_repo = RevokedTokenRepository::new(Arc::clone(&db));
    let campaign_repo = CampaignRepository::new(Arc::clone(&db));

    // Initialize services
    let fast_hashing = !config.environment.is_production();
    let issuer = TokenIssuer::new(
        &config.auth.jwt_secret,
        config.auth.access_token_minutes,
        config.auth.refresh_token_days,
    );

    let audit_service = AuditService::new(audit_repo, user_repo.clone());
    let auth_service = AuthService::new(
        user_repo.clone(),
        revoked_repo,
        issuer,
        revocation_cache.clone(),
        audit_service.clone(),
    );
    let user_service = UserService::new(
        user_repo.clone(),
        tenant_repo.clone(),
        audit_service.clone(),
        fast_hashing,
    );
    let tenant_service = TenantService::new(
        tenant_repo.clone(),
        user_repo.clone(),
        diploma_repo.clone(),
        audit_service.clone(),
    );
    let diploma_service = DiplomaService::new(
        diploma_repo,
        audit_service.clone(),
        Arc::new(SimulatedLedger::default()),
    );
    let campaign_service = CampaignService::new(campaign_repo, audit_service.clone());

    // Seed the default tenant and administrator
    let bootstrap = BootstrapService::new(tenant_repo, user_repo, fast_hashing);
    bootstrap.run(&config.seed).await?;

    let state = AppState {
        db: Arc::clone(&db),
        revocation_cache,
        auth_service,
        user_service,
        tenant_service,
        diploma_service,
        campaign_service,
        audit_service,
    };

    let app = Router::new()
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(middleware::from_fn(error_envelope))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
