use std::net::SocketAddr;

use ledger_backend::{config::Config, create_router, storage::DbConnection, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Connecting to database");
    // No retry: an unreachable store is fatal
    let db = match DbConnection::new(&config.database_url).await {
        Ok(db) => {
            info!("Connected to database");
            db
        }
        Err(e) => {
            error!("Error connecting to database: {:#}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(AppState::new(db));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
