//! Discover API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p discover-api
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env` file.

use discover_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Discover API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        memory = config.database.is_memory(),
        "Configuration loaded"
    );

    discover_api::run(config).await?;

    Ok(())
}
