use std::net::SocketAddr;
use std::sync::Arc;

use onboarding_service::config::Config;
use onboarding_service::store::rest::RestStore;
use onboarding_service::{notify, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onboarding_service=debug,tower_http=debug".into()),
        )
        .init();

    // Load config
    let config = Config::from_env().expect("Failed to load configuration");

    // Wire the datastore and notifier explicitly; no ambient globals
    let store = Arc::new(RestStore::new(&config)?);
    tracing::info!("Datastore client ready: {}", config.datastore_url);

    let notifier = notify::from_config(&config);

    // Build app state
    let state = AppState::new(store, notifier, config.clone());

    // Build router
    let app = onboarding_service::routes::create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .expect("Invalid server address");

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
