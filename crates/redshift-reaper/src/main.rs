use anyhow::Result;
use clap::Parser;
use redshift_reaper_core::Config;
use tracing::{debug, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::ReaperCliError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    // Load configuration from specified path or default location
    let loaded = match &cli.config_file {
        Some(config_file) => {
            let path = std::path::PathBuf::from(config_file);
            debug!("Loading config from explicit path: {:?}", path);
            Config::load_from_path(&path).map(|config| (config, Some(path)))
        }
        None => {
            debug!("Loading config from default location");
            Config::load().map(|config| (config, None))
        }
    };
    let (config, config_path) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            ReaperCliError::from(e).print_diagnostic();
            std::process::exit(1);
        }
    };
    let conn_mgr = ConnectionManager::with_config_path(config, config_path);

    if let Err(e) = execute_command(&cli, &conn_mgr).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "redshift_reaper=warn,redshift_reaper_core=warn,aws_config=error",
            1 => "redshift_reaper=info,redshift_reaper_core=info,aws_config=warn",
            2 => {
                "redshift_reaper=debug,redshift_reaper_core=debug,aws_config=info,aws_sdk_redshift=info"
            }
            _ => {
                "redshift_reaper=trace,redshift_reaper_core=trace,aws_config=debug,aws_sdk_redshift=debug,aws_smithy_runtime=debug"
            }
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), ReaperCliError> {
    trace!("Executing command: {:?}", cli.command);

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Nuke(args) => {
            debug!("Executing nuke command");
            commands::nuke::handle_nuke_command(args, conn_mgr, cli.profile.as_deref(), cli.output)
                .await
        }
        Commands::Profile(profile_cmd) => {
            debug!("Executing profile command");
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, cli.output).await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => info!("Command failed after {:?}: {}", duration, e),
    }

    result
}
