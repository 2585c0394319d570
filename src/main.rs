//! Main entry point for the gstr2a-puller CLI

use clap::Parser;
use gstr2a_puller::cli::{Cli, Commands};
use gstr2a_puller::logging;
use gstr2a_puller::shutdown::ShutdownCoordinator;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = cli.to_config();

    match cli.command {
        Commands::Pull(_) => {
            if let Err(e) = logging::init_tracing(&config.log_level, &config.log_dir) {
                logging::init_console(&config.log_level);
                warn!("Log file unavailable ({}); logging to console only", e);
            }
        }
        Commands::Validate(_) => logging::init_console(&config.log_level),
    }

    let result = match cli.command {
        Commands::Pull(ref cmd) => cmd
            .execute(&config, ShutdownCoordinator::shared())
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Validate(ref cmd) => cmd.execute().await.map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
