use super::commands::Cli;
use revive_daemon::SupervisorConfig;
use revive_types::{ReviveError, ReviveResult};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".revive").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("revive.toml"))
}

/// Configuration plus what happened while loading it, kept until logging is up.
pub struct LoadedConfig {
    pub config: SupervisorConfig,
    pub file_found: bool,
    pub rejected_overrides: Vec<String>,
}

impl LoadedConfig {
    /// Emits the load-time diagnostics through the now-installed subscriber.
    pub fn log_diagnostics(&self, config_path: &Path) {
        if !self.file_found {
            info!("Config file {:?} not found, using defaults", config_path);
        }
        for rejected in &self.rejected_overrides {
            warn!("{}", rejected);
        }
    }
}

/// File, then environment, then command-line overrides; validated last.
pub fn load_config(cli: &Cli, config_path: &Path) -> ReviveResult<LoadedConfig> {
    load_config_with(cli, config_path, |key| std::env::var(key).ok())
}

fn load_config_with<F>(cli: &Cli, config_path: &Path, lookup: F) -> ReviveResult<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let file_found = config_path.exists();
    let mut config = SupervisorConfig::read(config_path)?;
    let rejected_overrides = config.apply_overrides_from(lookup);

    if let Some(ref dir) = cli.work_dir {
        config.work_dir = dir.clone();
    }

    config.validate()?;
    Ok(LoadedConfig {
        config,
        file_found,
        rejected_overrides,
    })
}

/// Installs the global subscriber: stderr echo plus, when `to_file`, the monitor log.
pub fn init_logging(cli: &Cli, config: &SupervisorConfig, to_file: bool) -> ReviveResult<()> {
    let level = if cli.quiet {
        "warn".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.to_string(),
            1 => "info,revive_daemon=debug".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let json = config.logging.json;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.logging.stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(cli.verbose >= 2);
        layers.push(if json {
            stderr_layer.json().boxed()
        } else {
            stderr_layer.boxed()
        });
    }

    if to_file {
        let path = cli
            .log_file
            .clone()
            .unwrap_or_else(|| config.monitor_log_path());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                ReviveError::Logging(format!("Failed to open monitor log {:?}: {}", path, e))
            })?;
        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false);
        layers.push(if json {
            file_layer.json().boxed()
        } else {
            file_layer.boxed()
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| ReviveError::Logging(format!("Failed to install logger: {}", e)))
}

/// Stderr-only subscriber for errors raised before the configured one exists.
///
/// Does nothing when a global subscriber is already installed.
pub fn init_bootstrap_logging() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::new("info"))
        .try_init();
}

pub fn show_version() {
    println!("\x1b[38;5;46mrevive\x1b[0m v{}", BUILD_VERSION);
    println!("Process watchdog: poll, relaunch, stop at the restart ceiling");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("revive-cli-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_config_keeps_rejected_overrides_for_later() {
        let dir = scratch_dir();
        let cli = Cli::parse_from([
            "revive",
            "-c",
            "/nonexistent/revive/cfg.toml",
            "-w",
            dir.to_str().unwrap(),
            "check",
        ]);

        let loaded = load_config_with(&cli, cli.config.as_deref().unwrap(), |key| {
            (key == "REVIVE_POLL_INTERVAL").then(|| "sixty".to_string())
        })
        .unwrap();

        assert!(!loaded.file_found);
        assert_eq!(loaded.config.work_dir, dir);
        assert_eq!(loaded.rejected_overrides.len(), 1);
        assert!(loaded.rejected_overrides[0].contains("REVIVE_POLL_INTERVAL: sixty"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_config_rejects_missing_work_dir() {
        let cli = Cli::parse_from(["revive", "-w", "/definitely/not/a/revive/dir", "check"]);
        let err = load_config_with(&cli, Path::new("/nonexistent/revive/cfg.toml"), |_| None)
            .err()
            .unwrap();
        assert!(matches!(err, ReviveError::Config(_)));
    }
}
