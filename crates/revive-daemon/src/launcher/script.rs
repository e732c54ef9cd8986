use async_trait::async_trait;
use chrono::Local;
use revive_types::{ReviveError, ReviveResult};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::{debug, info, warn};

use super::log_file::create_restart_log;
use super::{LaunchReceipt, Launcher};
use crate::config::{LaunchConfig, SupervisorConfig};

/// Runs `<shell> <script> [args...]` in the working directory as a detached process.
///
/// Output goes to a new `restart_*.log`, scripted answers are written to stdin and the pipe is
/// closed. The child is never awaited or killed by the watchdog.
pub struct ScriptLauncher {
    work_dir: PathBuf,
    script: PathBuf,
    launch: LaunchConfig,
}

impl ScriptLauncher {
    pub fn new(config: &SupervisorConfig) -> Self {
        Self {
            work_dir: config.work_dir.clone(),
            script: config.script_path(),
            launch: config.launch.clone(),
        }
    }

    fn command(&self, stdout: std::fs::File, stderr: std::fs::File) -> Command {
        let mut command = std::process::Command::new(&self.launch.shell);
        command
            .arg(&self.script)
            .args(&self.launch.args)
            .current_dir(&self.work_dir)
            .envs(self.launch.environment())
            .stdin(Stdio::piped())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));

        // Own process group: a Ctrl-C aimed at the watchdog must not reach the target.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        Command::from(command)
    }
}

/// How long a target may leave its stdin unread before the answers are abandoned.
const STDIN_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Writes the scripted answers off the supervision task, then closes the pipe.
///
/// A target that never reads stdin cannot stall the loop: the write runs detached and gives up
/// after [`STDIN_DELIVERY_TIMEOUT`].
async fn deliver_answers(mut stdin: ChildStdin, payload: Vec<u8>, pid: Option<u32>) {
    match tokio::time::timeout(STDIN_DELIVERY_TIMEOUT, stdin.write_all(&payload)).await {
        Ok(Ok(())) => debug!("Delivered {} byte(s) of answers to pid {:?}", payload.len(), pid),
        Ok(Err(e)) => warn!("Could not deliver scripted answers to pid {:?}: {}", pid, e),
        Err(_) => warn!(
            "pid {:?} did not read its answers within {:?}; closing stdin",
            pid, STDIN_DELIVERY_TIMEOUT
        ),
    }
}

#[async_trait]
impl Launcher for ScriptLauncher {
    async fn launch(&self) -> ReviveResult<LaunchReceipt> {
        if !self.script.is_file() {
            return Err(ReviveError::Launch(format!(
                "start script {:?} not found",
                self.script
            )));
        }

        let (log_path, stdout) = create_restart_log(&self.work_dir, Local::now().naive_local())
            .map_err(|e| {
                ReviveError::Launch(format!(
                    "cannot create restart log in {:?}: {}",
                    self.work_dir, e
                ))
            })?;
        let stderr = stdout
            .try_clone()
            .map_err(|e| ReviveError::Launch(format!("cannot share restart log handle: {}", e)))?;

        info!("Launching {} {:?} (output: {:?})", self.launch.shell, self.script, log_path);

        let mut child = match self.command(stdout, stderr).spawn() {
            Ok(child) => child,
            Err(e) => {
                let _ = std::fs::remove_file(&log_path);
                return Err(ReviveError::Launch(format!(
                    "failed to spawn {} {:?}: {}",
                    self.launch.shell, self.script, e
                )));
            }
        };

        let pid = child.id();

        if let Some(stdin) = child.stdin.take() {
            let payload = self.launch.stdin_payload();
            if !payload.is_empty() {
                tokio::spawn(deliver_answers(stdin, payload, pid));
            }
        }

        Ok(LaunchReceipt { pid, log_path })
    }
}
