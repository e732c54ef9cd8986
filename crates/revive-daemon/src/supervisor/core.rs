use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::cancellation::CancellationToken;
use super::types::*;
use crate::config::SupervisorConfig;
use crate::launcher::Launcher;
use crate::probe::ProcessProbe;

/// Drives the check → restart → wait cycle for a single target process.
pub struct Supervisor<P, L> {
    config: SupervisorConfig,
    probe: P,
    launcher: L,
}

impl<P, L> Supervisor<P, L>
where
    P: ProcessProbe,
    L: Launcher,
{
    pub fn new(config: SupervisorConfig, probe: P, launcher: L) -> Self {
        Self {
            config,
            probe,
            launcher,
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs until the restart ceiling is reached or `cancel` fires.
    ///
    /// Launched targets are left running either way.
    pub async fn run(&self, mut cancel: CancellationToken) -> SupervisorReport {
        let mut state = SupervisorState::new();

        info!(
            "Supervising '{}' (poll {}s, grace {}s, max {} restarts)",
            self.config.process_pattern,
            self.config.poll_interval_secs,
            self.config.grace_period_secs,
            self.config.max_restarts
        );

        while state.running {
            if cancel.is_cancelled() {
                self.stop_on_signal(&mut state);
                break;
            }

            if let Some(pause) = self.step(&mut state).await {
                if !sleep_unless_cancelled(pause, &mut cancel).await {
                    self.stop_on_signal(&mut state);
                }
            }
        }

        let report = SupervisorReport {
            reason: state.stop_reason().unwrap_or(StopReason::Signaled),
            restart_count: state.restart_count,
            stats: state.stats,
        };
        info!("Supervision ended: {}", report);
        report
    }

    /// One CHECKING pass, plus RESTARTING when the target is gone.
    ///
    /// Returns how long to wait before the next check, or `None` once the ceiling is reached.
    pub async fn step(&self, state: &mut SupervisorState) -> Option<Duration> {
        let pattern = &self.config.process_pattern;

        state.enter(Phase::Checking);
        if self.check_liveness(state).await {
            info!("Process '{}' is running", pattern);
            state.enter(Phase::IdleWait);
            return Some(self.config.poll_interval());
        }

        warn!("Process '{}' is not running", pattern);
        state.enter(Phase::Restarting);

        match self.launcher.launch().await {
            Ok(receipt) => {
                state.restart_count += 1;
                state.stats.last_restart_log = Some(receipt.log_path.clone());
                info!(
                    "Restart {}/{} issued (pid {}, output {:?})",
                    state.restart_count,
                    self.config.max_restarts,
                    receipt
                        .pid
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "unknown".into()),
                    receipt.log_path
                );

                if state.restart_count >= self.config.max_restarts {
                    warn!(
                        "Restart ceiling of {} reached, no further checks",
                        self.config.max_restarts
                    );
                    state.enter(Phase::CeilingReached);
                    return None;
                }

                state.enter(Phase::GraceWait);
                Some(self.config.grace_period())
            }
            Err(e) => {
                state.stats.launch_failures += 1;
                error!("Restart failed, retrying next cycle: {}", e);
                state.enter(Phase::IdleWait);
                Some(self.config.poll_interval())
            }
        }
    }

    /// A query that cannot be performed counts as "not running".
    async fn check_liveness(&self, state: &mut SupervisorState) -> bool {
        state.stats.checks += 1;

        match self.probe.is_running(&self.config.process_pattern).await {
            Ok(running) => running,
            Err(e) => {
                state.stats.query_failures += 1;
                warn!(
                    "Liveness check for '{}' failed, assuming it is down: {}",
                    self.config.process_pattern, e
                );
                false
            }
        }
    }

    fn stop_on_signal(&self, state: &mut SupervisorState) {
        info!(
            "Termination requested during {:?}, stopping after {} restart(s)",
            state.phase, state.restart_count
        );
        state.enter(Phase::SignaledStop);
    }
}

/// Sleeps for `duration`; returns false if cancelled first.
async fn sleep_unless_cancelled(duration: Duration, cancel: &mut CancellationToken) -> bool {
    debug!("Waiting {:?} before next check", duration);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
