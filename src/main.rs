use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use credential_dialog::api::{CredentialService, CredentialsClient};
use credential_dialog::cli::commands::{dialog, list};
use credential_dialog::cli::{Cli, Commands};
use credential_dialog::config::Config;
use credential_dialog::dialog::DialogContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref())?;

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&loaded.config.log_file)
        .with_context(|| format!("Failed to open log file: {:?}", loaded.config.log_file))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let mut config = loaded.finish();
    config.apply_overrides(cli.api_url.clone(), cli.token.clone());

    info!("Starting credential-dialog against {}", config.api.base_url);
    config.validate()?;

    let service: Arc<dyn CredentialService> = Arc::new(CredentialsClient::new(&config.api)?);
    let context = DialogContext::new(service.clone(), config.view_options());
    let settle_timeout = Duration::from_secs(config.api.timeout_secs);

    match cli.command {
        Commands::Add(args) => dialog::add_command(args, context, settle_timeout).await,
        Commands::Edit(args) => dialog::edit_command(args, context, settle_timeout).await,
        Commands::List(args) => list::list_command(args, service, config.view_options()).await,
    }
}
