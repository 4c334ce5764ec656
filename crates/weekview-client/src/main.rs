//! weekview CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use weekview_client::cli::{Cli, Command, ConfigAction};
use weekview_client::commands;
use weekview_client::config::ClientConfig;
use weekview_client::error::{ClientError, ClientResult};
use weekview_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let loaded = if cli.config.is_some() {
        ClientConfig::load_from(&config_path)
    } else {
        ClientConfig::load()
    };
    let debug = cli.debug || loaded.as_ref().is_ok_and(|config| config.debug);

    if let Err(e) = init_tracing(TracingConfig::cli(debug)) {
        eprintln!("warning: {}", e);
    }

    // An explicit --config must load; the default file falls back to defaults.
    let config = match loaded {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => {
            let err = ClientError::Config(e);
            eprintln!("error: {}", err);
            return ExitCode::from(err.exit_code());
        }
        Err(e) => {
            warn!(error = %e, "ignoring unreadable configuration");
            ClientConfig::default()
        }
    };

    match run(cli.command, &config, &config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(
    command: Option<Command>,
    config: &ClientConfig,
    config_path: &std::path::Path,
) -> ClientResult<()> {
    match command {
        Some(Command::Show(args)) => commands::show::run(args, config).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(config, config_path),
            ConfigAction::Validate => commands::config::validate(config),
            ConfigAction::Path => commands::config::path(config_path),
        },
        None => commands::show::run(Default::default(), config).await,
    }
}
