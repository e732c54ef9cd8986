//! Restart action: issue the start script without waiting on it.

mod log_file;
mod script;

pub use log_file::{create_restart_log, restart_log_stem};
pub use script::ScriptLauncher;

use async_trait::async_trait;
use revive_types::ReviveResult;
use std::path::PathBuf;

/// What a successfully issued launch left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchReceipt {
    pub pid: Option<u32>,
    pub log_path: PathBuf,
}

/// Issues one restart of the supervised target.
///
/// Success means the launch was issued, not that the target came up.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self) -> ReviveResult<LaunchReceipt>;
}
