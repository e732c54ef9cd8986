use async_trait::async_trait;
use revive_types::{ReviveError, ReviveResult};
use tokio::process::Command;
use tracing::trace;

use super::ProcessProbe;

/// Delegates to `pgrep -f`, where the pattern is an extended regex over the full command line.
pub struct PgrepProbe {
    program: String,
    own_pid: u32,
}

impl PgrepProbe {
    pub fn new() -> Self {
        Self::with_program("pgrep")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            own_pid: std::process::id(),
        }
    }
}

impl Default for PgrepProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessProbe for PgrepProbe {
    async fn matching_pids(&self, pattern: &str) -> ReviveResult<Vec<u32>> {
        let output = Command::new(&self.program)
            .arg("-f")
            .arg(pattern)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ReviveError::Query(format!("failed to run {}: {}", self.program, e)))?;

        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let pids: Vec<u32> = stdout
                    .lines()
                    .filter_map(|line| line.trim().parse().ok())
                    .filter(|pid| *pid != self.own_pid)
                    .collect();
                trace!("{} matched {} process(es) for '{}'", self.program, pids.len(), pattern);
                Ok(pids)
            }
            Some(1) => Ok(Vec::new()),
            code => Err(ReviveError::Query(format!(
                "{} exited with {:?}: {}",
                self.program,
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}
