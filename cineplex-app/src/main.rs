use anyhow::Context;
use cineplex_app::{build_box_office, run, Command};
use cineplex_store::app_config::{Config, StorageBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cineplex_app=debug,cineplex_booking=debug,cineplex_store=info".into()),
        )
        // stdout carries the JSON response
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().context("Failed to load config")?;
    match config.storage.backend {
        StorageBackend::File => tracing::info!(
            "Starting Cineplex with catalog {} (file storage at {})",
            config.catalog.path,
            config.storage.path
        ),
        StorageBackend::Memory => tracing::info!(
            "Starting Cineplex with catalog {} (memory storage)",
            config.catalog.path
        ),
    }

    let command = Command::parse(std::env::args().skip(1))?;
    let office = build_box_office(&config)?;

    let response = run(&office, command);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
