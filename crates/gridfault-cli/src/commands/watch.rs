use std::sync::Arc;

use gridfault_core::{Config, Database, EmailNotifier, ReminderEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run the reminder engine in the foreground until ctrl-c.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;
    let store = Arc::new(Database::open()?);
    let notifier = Arc::new(EmailNotifier::from_endpoint(&config.notifier.endpoint)?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let engine = ReminderEngine::new(store, notifier, config.reminder.clone());
        engine.start();
        info!("watching for stale reports, ctrl-c to stop");

        tokio::signal::ctrl_c().await?;
        engine.stop();
        Ok::<_, std::io::Error>(())
    })?;

    Ok(())
}
