// Daybook - private diary
// Entry point and application setup

use anyhow::Context;
use clap::Parser;
use daybook::app::{AppState, Platform};
use daybook::cli::Cli;
use daybook::commands;
use daybook::config::SECURE_STORE_SERVICE;
use daybook::platform::{LogNotifier, NoBiometrics};
use daybook::services::CronNotificationScheduler;
use daybook::storage::KeyringStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daybook=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    let scheduler = CronNotificationScheduler::new(Arc::new(LogNotifier))
        .await
        .context("Failed to create reminder scheduler")?;

    let platform = Platform {
        secure_store: Arc::new(KeyringStore::new(SECURE_STORE_SERVICE)),
        biometrics: Arc::new(NoBiometrics),
        scheduler: Arc::new(scheduler),
    };

    let state = AppState::open(data_dir, platform)
        .await
        .context("Failed to open diary")?;

    commands::run(&state, cli.command).await?;

    Ok(())
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir().context("Could not determine the user data directory")?;
    Ok(dir.join("daybook"))
}
