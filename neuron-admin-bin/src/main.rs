mod commands;

use clap::Parser;
use commands::Command;
use neuron_admin_client::HttpConfigClient;
use neuron_admin_common::Logger;
use neuron_admin_error::{NAError, NAResult};
use neuron_admin_models::{constants::DEFAULT_CONFIG_FILE_NAME, settings::Settings};
use std::{env::current_dir, path::PathBuf};
use tracing::{debug, Level};

/// Neuron Admin - command line administration for neuron-style gateways
///
/// Imports tag sheets, manages south drivers, node configuration and
/// plugin libraries through the gateway configuration API.
#[derive(Parser)]
#[command(name = "neuron-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Neuron Admin", long_about = None)]
struct Cli {
    /// Sets a custom config file with full path
    ///
    /// If not specified, 'neuron-admin.toml' in the current working
    /// directory is used when present.
    #[arg(short, long, env = "NA_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides `log.level` from the config file (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> NAResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(p) => p,
        None => {
            let dir = current_dir()
                .map_err(|e| NAError::from(format!("Failed to get current directory: {e}")))?;
            dir.join(DEFAULT_CONFIG_FILE_NAME)
        }
    };
    let settings = Settings::new(&config_path.to_string_lossy())?;

    // The logger owns the file writer guard and must outlive the command
    let mut logger = Logger::new(&settings.log);
    logger.initialize()?;
    if let Some(level) = cli.log_level {
        logger.set_level(level);
    }
    debug!("Log level: {}", logger.get_level());

    let client = HttpConfigClient::new(&settings.client)?;
    client.authenticate(&settings.client).await?;

    commands::run(cli.command, &client, &settings).await
}
