use std::sync::Arc;

use anyhow::Context;
use api::{router, AppState};
use auth::{
    AuthService, AuthorizationGuard, HashParams, InMemoryUserStore, PasswordHasher, TokenService,
    UserService, UserStore,
};
use idkit_core::AppConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = PasswordHasher::new(HashParams {
        memory_kib: config.auth.hash_memory_kib,
        iterations: config.auth.hash_iterations,
        parallelism: config.auth.hash_parallelism,
    })
    .context("invalid password hashing parameters")?;

    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_expiry_seconds)
        .context("invalid token settings")?;

    let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let guard = AuthorizationGuard::new(tokens.clone());

    Ok(AppState::new(
        AuthService::new(Arc::clone(&store), hasher, tokens),
        UserService::new(store, guard.clone()),
        guard,
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, overrides) = AppConfig::load_with_env().context("failed to load configuration")?;

    init_tracing(&config.log.filter)?;
    if !overrides.is_empty() {
        tracing::info!(?overrides, "configuration overridden from environment");
    }
    tracing::debug!(auth = ?config.auth, "auth configuration");

    let app = router::router(Arc::new(build_state(&config)?));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
