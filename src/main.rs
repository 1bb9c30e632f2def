use sensor_readings_api::config::LogFormat;
use sensor_readings_api::repositories::ReadingRepository;
use sensor_readings_api::services::{AuthGate, ReadingService};
use sensor_readings_api::{create_pool, ensure_schema, routes, Config};
use std::path::Path;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.yaml".into());
    let config = Config::load(&cfg_path)?;

    init_tracing(&config);
    info!("Starting sensor-readings-api");
    if !Path::new(&cfg_path).exists() {
        info!("Config file {} not found, using environment", cfg_path);
    }
    info!(schema = ?config.ingest.schema, "Configuration loaded");

    let pool = create_pool(&config.database).await?;
    ensure_schema(&pool).await?;
    info!("Database ready");

    let repository = ReadingRepository::new(pool);
    let auth = AuthGate::new(config.auth.auth_key.clone());
    let service = ReadingService::new(repository, auth, config.ingest.schema);

    let app = routes::create_router(service);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Application shutdown complete");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init(),
    }
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
