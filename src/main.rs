mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{resolve_public_ip, PodmanAdapter};
use application::{CommandEngine, Dispatcher};
use config::{Config, TargetsFile};
use interface::http::{create_router, AppState, ChannelGate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("podwarden={},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting PodWarden v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    let Some(ingress_token) = config.ingress_token.clone() else {
        error!("Ingress token not set. Please configure the PODWARDEN_INGRESS_TOKEN environment variable.");
        return Err("PODWARDEN_INGRESS_TOKEN is not set".into());
    };

    // Target registry
    let mut targets = TargetsFile::load(&config.targets_path)?;
    let public_ip = if targets.needs_public_ip() {
        resolve_public_ip(&config.public_ip_url, config.runtime_timeout).await
    } else {
        String::new()
    };
    let flavor_lines = std::mem::take(&mut targets.flavor_lines);
    let registry = Arc::new(targets.into_registry(&public_ip)?);

    if registry.is_empty() {
        warn!("No containers configured; status and stats tables will be empty");
    } else {
        info!("✓ Monitoring {} containers", registry.len());
    }

    // Runtime adapter; connections are opened per command
    let runtime = Arc::new(PodmanAdapter::new(&config.podman_socket, config.runtime_timeout))
        as Arc<dyn ports::ContainerRuntime>;

    let engine = Arc::new(CommandEngine::new(registry, runtime));
    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(engine, flavor_lines)),
        gate: Arc::new(ChannelGate::new(
            config.bot_user_id,
            config.allowed_guilds.clone(),
            config.allowed_channels.clone(),
        )),
        ingress_token: Arc::from(ingress_token),
    };

    info!("✓ Command engine initialized");

    // Create HTTP server
    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ PodWarden listening on {}", addr);
    info!("  → Messages: http://localhost:{}/api/messages", config.port);
    info!("  → Health: http://localhost:{}/api/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
