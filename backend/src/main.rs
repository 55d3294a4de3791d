use breeding_manager::config::AppConfig;
use breeding_manager::{create_router, initialize_backend, spawn_session_sweeper};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    info!("Starting breeding manager with {:?}", config);

    let app_state = initialize_backend(&config).await?;

    let sweeper = spawn_session_sweeper(
        app_state.session_service.clone(),
        config.session_poll_interval(),
    );
    info!(
        "Sessions last {}s, swept every {}s",
        config.session_timeout().as_secs(),
        config.session_poll_interval().as_secs()
    );

    let app = create_router(app_state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    sweeper.abort();
    Ok(())
}
