mod check;
mod commands;
mod config_cmd;
mod run;
mod utils;

pub use check::run_check;
pub use commands::{Cli, Commands};
pub use config_cmd::handle_config;
pub use run::run_watchdog;
pub use utils::{
    default_config_path, init_bootstrap_logging, init_logging, load_config, show_version,
};
