//! Crypton CLI entry point

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crypton_cli::{
    cli::Cli,
    commands::CommandDispatcher,
    config::{ConfigOverrides, ConsoleAppConfig},
    error::Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    setup_logging(cli.verbose);

    // Load configuration
    let overrides = ConfigOverrides {
        config_file: cli.config.clone(),
        seed: cli.seed,
        no_color: cli.no_color,
    };
    let config = match ConsoleAppConfig::load_with_overrides(&overrides) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    debug!(?config, "Configuration loaded");

    // Execute the command
    if let Err(e) = CommandDispatcher::execute(&cli, config).await {
        error!("Command execution failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Setup logging on stderr; `RUST_LOG` wins over `--verbose`
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
