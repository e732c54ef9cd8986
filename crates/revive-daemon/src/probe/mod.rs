//! Process-table queries backing the liveness check.

mod pgrep;
mod process_table;

pub use pgrep::PgrepProbe;
pub use process_table::SysinfoProbe;

use async_trait::async_trait;
use revive_types::ReviveResult;

use crate::config::{ProbeKind, SupervisorConfig};

/// Answers whether a process matching a pattern currently exists.
///
/// Implementations return `ReviveError::Query` when the process table cannot be read;
/// deciding what a failed query means is left to the caller.
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    /// PIDs of every running process whose command line matches `pattern`.
    async fn matching_pids(&self, pattern: &str) -> ReviveResult<Vec<u32>>;

    async fn is_running(&self, pattern: &str) -> ReviveResult<bool> {
        Ok(!self.matching_pids(pattern).await?.is_empty())
    }
}

pub fn build_probe(config: &SupervisorConfig) -> Box<dyn ProcessProbe> {
    match config.probe {
        ProbeKind::Sysinfo => Box::new(SysinfoProbe::new(config.match_mode)),
        ProbeKind::Pgrep => Box::new(PgrepProbe::new()),
    }
}

#[async_trait]
impl<P: ProcessProbe + ?Sized> ProcessProbe for Box<P> {
    async fn matching_pids(&self, pattern: &str) -> ReviveResult<Vec<u32>> {
        (**self).matching_pids(pattern).await
    }

    async fn is_running(&self, pattern: &str) -> ReviveResult<bool> {
        (**self).is_running(pattern).await
    }
}
