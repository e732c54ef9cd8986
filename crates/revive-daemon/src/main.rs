mod cli;

use clap::Parser;
use cli::{
    Cli, Commands, default_config_path, handle_config, init_bootstrap_logging, init_logging,
    load_config, run_check, run_watchdog, show_version,
};
use revive_types::ReviveResult;
use std::path::Path;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match dispatch(&cli, &config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // No-op once the configured subscriber is in place.
            init_bootstrap_logging();
            error!("revive failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: &Cli, config_path: &Path) -> ReviveResult<()> {
    match cli.command.clone().unwrap_or_default() {
        Commands::Run { pid_file } => {
            let loaded = load_config(cli, config_path)?;
            init_logging(cli, &loaded.config, true)?;
            loaded.log_diagnostics(config_path);
            run_watchdog(loaded.config, pid_file).await?;
        }
        Commands::Check { format } => {
            let loaded = load_config(cli, config_path)?;
            init_logging(cli, &loaded.config, false)?;
            loaded.log_diagnostics(config_path);
            run_check(&loaded.config, &format).await?;
        }
        Commands::Config { action } => {
            handle_config(cli, config_path, action)?;
        }
        Commands::Version => {
            show_version();
        }
    }

    Ok(())
}
