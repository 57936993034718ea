//! Handler for the `run` command.

use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::runtime;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();
    info!(
        config = %args.config.display(),
        port = config.server.port,
        "edgewatch starting"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        let _ = shutdown_tx.send(true);
    });

    runtime::run_with_shutdown(config, shutdown_rx).await
}
