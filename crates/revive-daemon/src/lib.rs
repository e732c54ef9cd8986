#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod launcher;
pub mod probe;
pub mod supervisor;

pub use config::{LaunchConfig, LoggingConfig, MatchMode, ProbeKind, SupervisorConfig};
pub use launcher::{LaunchReceipt, Launcher, ScriptLauncher};
pub use probe::{build_probe, PgrepProbe, ProcessProbe, SysinfoProbe};
pub use supervisor::{
    CancellationToken, Phase, StopReason, Supervisor, SupervisorReport, SupervisorState,
    SupervisorStats,
};
