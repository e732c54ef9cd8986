#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! Shared types for the revive watchdog.

mod error;

pub use error::{ReviveError, ReviveResult};

/// Placeholder substituted with the configured credential in scripted stdin answers.
pub const CREDENTIAL_PLACEHOLDER: &str = "{credential}";

/// Prefix of every per-restart log file written into the working directory.
pub const RESTART_LOG_PREFIX: &str = "restart_";
