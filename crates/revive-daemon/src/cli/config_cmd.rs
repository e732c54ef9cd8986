use super::commands::{Cli, ConfigAction};
use super::utils::load_config;
use revive_daemon::SupervisorConfig;
use revive_types::{ReviveError, ReviveResult};
use std::path::Path;

pub fn handle_config(cli: &Cli, config_path: &Path, action: Option<ConfigAction>) -> ReviveResult<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            if !config_path.exists() {
                println!("\x1b[38;5;245mNo configuration file found at {:?}, showing defaults\x1b[0m", config_path);
            }
            match load_config(cli, config_path) {
                Ok(loaded) => {
                    for rejected in &loaded.rejected_overrides {
                        println!("\x1b[38;5;226m[!]\x1b[0m {}", rejected);
                    }
                    print!("{}", loaded.config.redacted());
                }
                Err(e) => println!("\x1b[38;5;196m[-]\x1b[0m {}", e),
            }
        }
        Some(ConfigAction::Validate) => match load_config(cli, config_path) {
            Ok(loaded) => {
                println!("\x1b[38;5;46m[+]\x1b[0m Configuration is valid");
                let warnings = loaded.rejected_overrides.iter().cloned();
                for warning in warnings.chain(loaded.config.warnings()) {
                    println!("\x1b[38;5;226m[!]\x1b[0m {}", warning);
                }
            }
            Err(e) => {
                println!("\x1b[38;5;196m[-]\x1b[0m {}", e);
                return Err(e);
            }
        },
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !force {
                return Err(ReviveError::Config(format!(
                    "{:?} already exists (use --force to overwrite)",
                    config_path
                )));
            }
            let mut config = SupervisorConfig::default();
            if let Some(ref dir) = cli.work_dir {
                config.work_dir = dir.clone();
            }
            config.save(config_path)?;
            println!("\x1b[38;5;46m[+]\x1b[0m Wrote default configuration to {:?}", config_path);
        }
        Some(ConfigAction::Path) => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
