use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "revive")]
#[command(version = BUILD_VERSION)]
#[command(about = "revive - keeps one long-running process alive by relaunching its start script")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'w', long, global = true, value_name = "DIR", env = "REVIVE_WORK_DIR", help = "Working directory of the supervised script")]
    pub work_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write the monitor log here instead of <work-dir>/monitor.log")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Supervise the target process (default)")]
    #[command(long_about = "Poll for the target process and relaunch its start script whenever it is gone.\n\nStops after max_restarts successful launches or on SIGINT/SIGTERM/SIGQUIT. Launched processes keep running after the watchdog exits.")]
    Run {
        #[arg(long, value_name = "FILE", help = "Write PID to file")]
        pid_file: Option<PathBuf>,
    },

    #[command(about = "Run a single liveness check")]
    Check {
        #[arg(long, default_value = "text", help = "Output format")]
        format: OutputFormat,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    #[command(about = "Show version information")]
    Version,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run { pid_file: None }
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show effective configuration (credential masked)")]
    Show,
    #[command(about = "Validate configuration")]
    Validate,
    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite existing configuration")]
        force: bool,
    },
    #[command(about = "Print the configuration file path")]
    Path,
}
