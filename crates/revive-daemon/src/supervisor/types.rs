use serde::Serialize;
use std::path::PathBuf;

/// Where the supervision loop currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Checking,
    IdleWait,
    Restarting,
    GraceWait,
    CeilingReached,
    SignaledStop,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::CeilingReached | Phase::SignaledStop)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// `max_restarts` launches were issued.
    CeilingReached,
    /// A termination signal arrived.
    Signaled,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SupervisorStats {
    pub checks: u64,
    pub query_failures: u64,
    pub launch_failures: u64,
    pub last_restart_log: Option<PathBuf>,
}

/// Mutable state owned by the loop. `restart_count` only ever grows and never passes the ceiling.
#[derive(Clone, Debug)]
pub struct SupervisorState {
    pub restart_count: u32,
    pub running: bool,
    pub phase: Phase,
    pub stats: SupervisorStats,
}

impl SupervisorState {
    pub fn new() -> Self {
        Self {
            restart_count: 0,
            running: true,
            phase: Phase::Checking,
            stats: SupervisorStats::default(),
        }
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        if phase.is_terminal() {
            self.running = false;
        }
    }

    pub(crate) fn stop_reason(&self) -> Option<StopReason> {
        match self.phase {
            Phase::CeilingReached => Some(StopReason::CeilingReached),
            Phase::SignaledStop => Some(StopReason::Signaled),
            _ => None,
        }
    }
}

impl Default for SupervisorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary handed back when the loop ends.
#[derive(Clone, Debug, Serialize)]
pub struct SupervisorReport {
    pub reason: StopReason,
    pub restart_count: u32,
    pub stats: SupervisorStats,
}

impl std::fmt::Display for SupervisorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            StopReason::CeilingReached => "restart ceiling reached",
            StopReason::Signaled => "termination signal",
        };
        write!(
            f,
            "{} after {} restart(s), {} check(s), {} failed launch(es), {} failed query(ies)",
            reason,
            self.restart_count,
            self.stats.checks,
            self.stats.launch_failures,
            self.stats.query_failures
        )
    }
}
