use serde::{Deserialize, Serialize};

/// Backend used to enumerate running processes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    #[default]
    Sysinfo,
    Pgrep,
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeKind::Sysinfo => write!(f, "sysinfo"),
            ProbeKind::Pgrep => write!(f, "pgrep"),
        }
    }
}

/// How the process pattern is compared against a command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Pattern appears anywhere in the space-joined command line (`pgrep -f`).
    #[default]
    Substring,
    /// One argv element equals the pattern exactly.
    Argument,
}

impl MatchMode {
    pub fn matches(&self, pattern: &str, argv: &[String]) -> bool {
        match self {
            MatchMode::Substring => argv.join(" ").contains(pattern),
            MatchMode::Argument => argv.iter().any(|arg| arg == pattern),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::Argument => write!(f, "argument"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse_lossy(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}
