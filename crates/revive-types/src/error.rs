use thiserror::Error;

/// Errors raised anywhere in the watchdog.
///
/// `Query` and `Launch` are recoverable inside the supervision loop; everything else
/// surfaces at the top level and terminates the process.
#[derive(Error, Debug)]
pub enum ReviveError {
    /// Configuration could not be read, parsed or validated.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The process table could not be queried.
    #[error("Process query error: {0}")]
    Query(String),

    /// A restart could not be issued.
    #[error("Launch error: {0}")]
    Launch(String),

    /// Filesystem or other I/O failure outside the loop.
    #[error("I/O error: {0}")]
    Io(String),

    /// Log sink could not be set up.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReviveError {
    /// True for the error kinds the supervision loop absorbs and retries.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReviveError::Query(_) | ReviveError::Launch(_))
    }
}

impl From<std::io::Error> for ReviveError {
    fn from(e: std::io::Error) -> Self {
        ReviveError::Io(e.to_string())
    }
}

/// Result alias used across the workspace.
pub type ReviveResult<T> = Result<T, ReviveError>;
