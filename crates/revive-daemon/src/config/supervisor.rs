use revive_types::{ReviveError, ReviveResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::constants::{
    DEFAULT_GRACE_PERIOD_SECS, DEFAULT_MAX_RESTARTS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_PROCESS_PATTERN, DEFAULT_SCRIPT, MIN_POLL_INTERVAL_SECS,
};
use super::launch::LaunchConfig;
use super::logging::LoggingConfig;
use super::types::{LogLevel, MatchMode, ProbeKind};

/// Everything the watchdog needs, fixed at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub work_dir: PathBuf,
    /// Start script; relative paths resolve against `work_dir`.
    pub script: PathBuf,
    /// Matched against the command line of every running process.
    pub process_pattern: String,
    pub poll_interval_secs: u64,
    pub max_restarts: u32,
    pub grace_period_secs: u64,
    pub probe: ProbeKind,
    pub match_mode: MatchMode,
    pub launch: LaunchConfig,
    pub logging: LoggingConfig,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            work_dir,
            script: PathBuf::from(DEFAULT_SCRIPT),
            process_pattern: DEFAULT_PROCESS_PATTERN.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_restarts: DEFAULT_MAX_RESTARTS,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            probe: ProbeKind::default(),
            match_mode: MatchMode::default(),
            launch: LaunchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SupervisorConfig {
    /// Reads the TOML file (defaults when absent), applies environment overrides and validates.
    pub fn load(path: impl AsRef<Path>) -> ReviveResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {:?} not found, using defaults", path);
        }

        let mut config = Self::read(path)?;
        for rejected in config.apply_env_overrides() {
            warn!("{}", rejected);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses the file without overrides or validation.
    pub fn read(path: impl AsRef<Path>) -> ReviveResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReviveError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| ReviveError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ReviveResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ReviveError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ReviveError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| ReviveError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    /// Applies `REVIVE_*` variables from the process environment.
    ///
    /// Returns one message per override that was ignored because its value did not parse. They
    /// are handed back rather than logged since this usually runs before logging is installed.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an injectable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();

        if let Some(dir) = lookup("REVIVE_WORK_DIR") {
            self.work_dir = PathBuf::from(dir);
        }

        if let Some(script) = lookup("REVIVE_SCRIPT") {
            self.script = PathBuf::from(script);
        }

        if let Some(pattern) = lookup("REVIVE_PATTERN") {
            self.process_pattern = pattern;
        }

        if let Some(secs) = lookup("REVIVE_POLL_INTERVAL") {
            match secs.parse() {
                Ok(v) => self.poll_interval_secs = v,
                Err(_) => rejected.push(format!("Ignoring invalid REVIVE_POLL_INTERVAL: {}", secs)),
            }
        }

        if let Some(max) = lookup("REVIVE_MAX_RESTARTS") {
            match max.parse() {
                Ok(v) => self.max_restarts = v,
                Err(_) => rejected.push(format!("Ignoring invalid REVIVE_MAX_RESTARTS: {}", max)),
            }
        }

        if let Some(secs) = lookup("REVIVE_GRACE_SECS") {
            match secs.parse() {
                Ok(v) => self.grace_period_secs = v,
                Err(_) => rejected.push(format!("Ignoring invalid REVIVE_GRACE_SECS: {}", secs)),
            }
        }

        if let Some(level) = lookup("REVIVE_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lossy(&level);
        }

        if let Some(json) = lookup("REVIVE_LOG_JSON") {
            match parse_flag(&json) {
                Some(v) => self.logging.json = v,
                None => rejected.push(format!("Ignoring invalid REVIVE_LOG_JSON: {}", json)),
            }
        }

        if let Some(credential) = lookup("REVIVE_CREDENTIAL") {
            self.launch.credential = Some(credential);
        }

        if self.launch.credential.is_none() {
            if let Some(name) = self.launch.credential_env.clone() {
                self.launch.credential = lookup(&name);
            }
        }

        rejected
    }

    pub fn validate(&self) -> ReviveResult<()> {
        if self.process_pattern.trim().is_empty() {
            return Err(ReviveError::Config("process_pattern cannot be empty".into()));
        }

        if self.poll_interval_secs < MIN_POLL_INTERVAL_SECS {
            return Err(ReviveError::Config(format!(
                "Poll interval must be at least {} second(s)",
                MIN_POLL_INTERVAL_SECS
            )));
        }

        if self.max_restarts == 0 {
            return Err(ReviveError::Config("max_restarts must be at least 1".into()));
        }

        if !self.work_dir.is_dir() {
            return Err(ReviveError::Config(format!(
                "Working directory {:?} does not exist or is not a directory",
                self.work_dir
            )));
        }

        if self.probe == ProbeKind::Pgrep && self.match_mode == MatchMode::Argument {
            return Err(ReviveError::Config(
                "match_mode 'argument' is only supported by the sysinfo probe".into(),
            ));
        }

        if self.launch.shell.trim().is_empty() {
            return Err(ReviveError::Config("launch.shell cannot be empty".into()));
        }

        Ok(())
    }

    /// Non-fatal problems worth a log line at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.script_path().is_file() {
            warnings.push(format!(
                "Start script {:?} does not exist yet; restarts will fail until it does",
                self.script_path()
            ));
        }

        if self.launch.needs_credential() && self.launch.credential.is_none() {
            let source = self
                .launch
                .credential_env
                .as_deref()
                .unwrap_or("REVIVE_CREDENTIAL");
            warnings.push(format!(
                "stdin answers reference a credential but none is set (export {})",
                source
            ));
        }

        if self.match_mode == MatchMode::Substring && self.process_pattern.len() < 4 {
            warnings.push(format!(
                "Short substring pattern '{}' may match unrelated processes",
                self.process_pattern
            ));
        }

        warnings
    }

    pub fn log_warnings(&self) {
        for warning in self.warnings() {
            warn!("{}", warning);
        }
    }

    pub fn script_path(&self) -> PathBuf {
        self.work_dir.join(&self.script)
    }

    pub fn monitor_log_path(&self) -> PathBuf {
        self.work_dir.join(&self.logging.file)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            work_dir: self.work_dir.clone(),
            script: self.script_path(),
            process_pattern: self.process_pattern.clone(),
            match_mode: self.match_mode,
            probe: self.probe,
            poll_interval_secs: self.poll_interval_secs,
            max_restarts: self.max_restarts,
            grace_period_secs: self.grace_period_secs,
            shell: self.launch.shell.clone(),
            env_keys: self.launch.environment().into_keys().collect(),
            credential_set: self.launch.credential.is_some(),
            stdin_answers: self.launch.stdin_answers.len(),
            monitor_log: self.monitor_log_path(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Printable view of the configuration with the credential value left out.
#[derive(Debug)]
pub struct RedactedConfig {
    pub work_dir: PathBuf,
    pub script: PathBuf,
    pub process_pattern: String,
    pub match_mode: MatchMode,
    pub probe: ProbeKind,
    pub poll_interval_secs: u64,
    pub max_restarts: u32,
    pub grace_period_secs: u64,
    pub shell: String,
    pub env_keys: Vec<String>,
    pub credential_set: bool,
    pub stdin_answers: usize,
    pub monitor_log: PathBuf,
}

impl std::fmt::Display for RedactedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "revive Watchdog Configuration")?;
        writeln!(f, "=============================")?;
        writeln!(f, "Working dir: {:?}", self.work_dir)?;
        writeln!(f, "Script: {:?} (via {})", self.script, self.shell)?;
        writeln!(f, "Pattern: '{}' ({}, {})", self.process_pattern, self.match_mode, self.probe)?;
        writeln!(f, "Poll interval: {}s", self.poll_interval_secs)?;
        writeln!(f, "Grace period: {}s", self.grace_period_secs)?;
        writeln!(f, "Max restarts: {}", self.max_restarts)?;
        writeln!(f, "Environment: {}", self.env_keys.join(", "))?;
        writeln!(f, "Credential: {}", if self.credential_set { "********" } else { "unset" })?;
        writeln!(f, "Stdin answers: {}", self.stdin_answers)?;
        writeln!(f, "Monitor log: {:?}", self.monitor_log)?;
        Ok(())
    }
}
