use serde::{Deserialize, Serialize};
use super::constants::DEFAULT_MONITOR_LOG;
use super::types::LogLevel;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Monitor log file, relative paths resolve against the working directory.
    pub file: String,
    pub json: bool,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: DEFAULT_MONITOR_LOG.to_string(),
            json: false,
            stderr: true,
        }
    }
}
