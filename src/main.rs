use anyhow::{Context, Result};
use log::{error, info};

use shelfscan::bootstrap::setup::{initialize_folder, initialize_logger};
use shelfscan::build_rocket;
use shelfscan::common::ROCKET_RUNTIME;
use shelfscan::config::AppConfig;

fn main() -> Result<()> {
    initialize_logger();

    let config = AppConfig::from_env()?;
    initialize_folder(&config)?;
    info!(
        "Starting server on {}:{} with products at {}",
        config.address,
        config.port,
        config.products_dir.display()
    );

    let result = ROCKET_RUNTIME.block_on(async { build_rocket(&config).launch().await });
    if let Err(e) = result {
        error!("Rocket server failed: {}", e);
        return Err(anyhow::Error::from(e)).context("server terminated");
    }

    Ok(())
}
