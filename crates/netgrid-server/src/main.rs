//! NetGrid Server — application entry point.

use netgrid_db::{DbConfig, DbManager, run_migrations};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("netgrid_db=info".parse().unwrap())
                .add_directive("netgrid_server=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting NetGrid server...");

    let config = DbConfig::from_env();
    let db = match DbManager::connect(&config).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_migrations(db.client()).await {
        tracing::error!(error = %err, "Schema migration failed");
        std::process::exit(1);
    }

    // TODO: Start REST API server

    tracing::info!("NetGrid server stopped.");
}
