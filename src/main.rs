use gym_tracker::api::routes::create_routes;
use gym_tracker::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file if present

    let config = AppConfig::from_env()?;
    init_logging(&config.log_level);

    let db_config = DatabaseConfig::from_env()?;
    let db = db_config.connect().await?;
    run_migrations(db.writer()).await?;
    info!(database_url = %db_config.database_url, "Database ready");

    if config.seed_database {
        DatabaseSeeder::new(db.clone()).seed_all().await?;
    }

    let app = create_routes(db.clone(), &config);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(environment = %config.environment, "Gym tracker API listening on http://{}", address);
    info!("Health check available at http://{}/api/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// RUST_LOG takes precedence over LOG_LEVEL.
fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
