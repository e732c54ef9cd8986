use async_trait::async_trait;
use revive_types::{ReviveError, ReviveResult};
use sysinfo::{ProcessRefreshKind, System, UpdateKind};
use tracing::trace;

use super::ProcessProbe;
use crate::config::MatchMode;

/// Reads the process table in-process through `sysinfo`.
pub struct SysinfoProbe {
    mode: MatchMode,
    own_pid: u32,
}

impl SysinfoProbe {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            own_pid: std::process::id(),
        }
    }
}

#[async_trait]
impl ProcessProbe for SysinfoProbe {
    async fn matching_pids(&self, pattern: &str) -> ReviveResult<Vec<u32>> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ReviveError::Query(
                "process listing is not supported on this platform".into(),
            ));
        }

        let pattern = pattern.to_string();
        let mode = self.mode;
        let own_pid = self.own_pid;

        tokio::task::spawn_blocking(move || {
            // The default refresh leaves `cmd()` empty; argv is what the pattern is matched against.
            let mut system = System::new();
            system.refresh_processes_specifics(
                ProcessRefreshKind::new().with_cmd(UpdateKind::Always),
            );

            let table = system.processes().iter().map(|(pid, process)| {
                let argv = if process.cmd().is_empty() {
                    vec![process.name().to_string()]
                } else {
                    process.cmd().to_vec()
                };
                (pid.as_u32(), argv)
            });

            let pids = select_matches(&pattern, mode, own_pid, table);
            trace!("sysinfo matched {} process(es) for '{}'", pids.len(), pattern);
            pids
        })
        .await
        .map_err(|e| ReviveError::Query(format!("process scan panicked: {}", e)))
    }
}

/// Filters a process table down to the PIDs matching `pattern`, never including `own_pid`.
pub(crate) fn select_matches<I>(pattern: &str, mode: MatchMode, own_pid: u32, table: I) -> Vec<u32>
where
    I: IntoIterator<Item = (u32, Vec<String>)>,
{
    let mut pids: Vec<u32> = table
        .into_iter()
        .filter(|(pid, _)| *pid != own_pid)
        .filter(|(_, argv)| mode.matches(pattern, argv))
        .map(|(pid, _)| pid)
        .collect();
    pids.sort_unstable();
    pids
}
