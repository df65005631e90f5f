//! Lector CLI - Command-line client for the image-to-text extraction backend.

use clap::Parser;
use lector_cli::commands;
use lector_cli::repl;
use lector_cli::{Cli, CliError, Command, Config, Formatter};
use lector_sdk::LectorClient;
use lector_session::Workbench;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr, results go to stdout)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> lector_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let mut config = Config::load_or_fallback(&Config::path()?);

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter).await?;
        }
        Some(Command::Presets) => {
            commands::execute_presets(&lector_domain::Prompt::new(), &formatter)?;
        }
        command => {
            // Everything else talks to the backend
            let server_url = match cli.server {
                Some(url) => url,
                None => config.get_active_profile()?.server_url.clone(),
            };
            config.session.validate().map_err(CliError::Config)?;
            let client = Arc::new(LectorClient::new(&server_url)?);
            let mut workbench = Workbench::new(client, config.session.clone());
            let download_dir = config.download_dir();

            match command {
                None | Some(Command::Repl) => {
                    repl::run_repl(&config, &mut workbench, &formatter).await?;
                }
                Some(Command::Extract(args)) => {
                    commands::execute_extract(args, &mut workbench, &download_dir, &formatter).await?;
                }
                Some(Command::ClearCache) => {
                    commands::execute_clear_cache(&mut workbench, &formatter).await?;
                }
                Some(Command::Export(args)) => {
                    commands::execute_export(args, &mut workbench, &download_dir, &formatter).await?;
                }
                Some(Command::Profile(_)) | Some(Command::Presets) => {}
            }
        }
    }

    Ok(())
}
