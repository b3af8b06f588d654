use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use origin_guard::api::{HttpCatalog, HttpGateway};
use origin_guard::config::Config;
use origin_guard::engine::{LastCheckLedger, Reconciler, Scheduler};
use origin_guard::init::setup_logging;
use origin_guard::store::JsonFileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting origin-guard...");

    if !std::path::Path::new(&config_path).exists() {
        info!("Config file not found, using defaults.");
    }

    // 3. Build Collaborators
    let catalog = Arc::new(HttpCatalog::new(&config.api));
    let gateway = Arc::new(HttpGateway::new(&config.api));
    let store = Arc::new(JsonFileStore::new(&config.storage.ledger_path));

    // 4. Report Previous Run (absent ledger on first run is simply empty)
    let previous = LastCheckLedger::load(store.as_ref()).await;
    if let Some(last) = previous.0.values().max() {
        info!(
            sources = previous.0.len(),
            last_check = %last,
            "Loaded previous check ledger"
        );
    } else {
        info!("No previous check ledger, starting fresh");
    }

    // 5. Build Scheduler
    let reconciler = Arc::new(Reconciler::new(
        catalog,
        gateway,
        store,
        config.blocklist.concurrent_sources,
    ));
    let scheduler = Arc::new(Scheduler::new(reconciler));

    // 6. Apply Initial Configuration (bad config leaves us idle, not dead)
    if let Err(e) = scheduler.configure(
        &config.blocklist.sources,
        config.blocklist.interval_seconds,
    ) {
        error!("Initial configuration rejected: {}", e);
    }

    // 7. SIGHUP reloads the config file and reconfigures the scheduler
    #[cfg(unix)]
    {
        let scheduler = scheduler.clone();
        let config_path = config_path.clone();
        tokio::spawn(async move {
            let mut hangup = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
                Ok(stream) => stream,
                Err(e) => {
                    error!("Failed to install SIGHUP handler: {}", e);
                    return;
                }
            };
            while hangup.recv().await.is_some() {
                info!("SIGHUP received, reloading configuration");
                match Config::load(&config_path).await {
                    Ok(new_config) => {
                        if let Err(e) = scheduler.configure(
                            &new_config.blocklist.sources,
                            new_config.blocklist.interval_seconds,
                        ) {
                            error!("Reconfiguration rejected: {}", e);
                        }
                    }
                    Err(e) => error!("Config reload failed: {:#}", e),
                }
            }
        });
    }

    // 8. Graceful Shutdown
    signal::ctrl_c().await?;
    info!("Shutdown signal received.");
    scheduler.shutdown();

    Ok(())
}
