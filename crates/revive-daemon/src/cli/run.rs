use revive_daemon::{build_probe, CancellationToken, ScriptLauncher, Supervisor, SupervisorConfig};
use revive_types::{ReviveError, ReviveResult};
use std::path::PathBuf;
use tracing::{error, info};

pub async fn run_watchdog(config: SupervisorConfig, pid_file: Option<PathBuf>) -> ReviveResult<()> {
    info!("Starting revive watchdog v{}", env!("CARGO_PKG_VERSION"));
    info!("Working directory: {:?}", config.work_dir);
    info!("Start script: {:?}", config.script_path());
    info!("Watching for: '{}' ({})", config.process_pattern, config.match_mode);
    info!("Poll interval: {}s", config.poll_interval_secs);
    config.log_warnings();

    if let Some(ref pid_path) = pid_file {
        let pid = std::process::id();
        if let Err(e) = std::fs::write(pid_path, pid.to_string()) {
            error!("Failed to write PID file {:?}: {}", pid_path, e);
            return Err(ReviveError::Io(format!("Failed to write PID file: {}", e)));
        }
        info!("PID file written: {:?}", pid_path);
    }

    let signals = match ShutdownSignals::install() {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to install signal handlers: {}", e);
            return Err(ReviveError::Internal(format!("signal handlers: {}", e)));
        }
    };

    let (cancel_tx, token) = CancellationToken::new();
    let listener = tokio::spawn(async move {
        let name = signals.recv().await;
        info!("Received {}, stopping watchdog", name);
        let _ = cancel_tx.send(true);
    });

    let supervisor = Supervisor::new(
        config.clone(),
        build_probe(&config),
        ScriptLauncher::new(&config),
    );
    let report = supervisor.run(token).await;
    listener.abort();

    if let Some(ref pid_path) = pid_file {
        let _ = std::fs::remove_file(pid_path);
    }

    info!("Watchdog exiting ({})", report);
    Ok(())
}

/// SIGINT, SIGTERM and SIGQUIT on unix; Ctrl+C elsewhere.
struct ShutdownSignals {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    quit: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    #[cfg(unix)]
    fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    #[cfg(not(unix))]
    fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.quit.recv() => "SIGQUIT",
        }
    }

    #[cfg(not(unix))]
    async fn recv(self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl+C handler failed: {}", e);
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    }
}
