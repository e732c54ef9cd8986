pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_MAX_RESTARTS: u32 = 20;
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 30;
pub const DEFAULT_SCRIPT: &str = "run_rl_swarm.sh";
pub const DEFAULT_PROCESS_PATTERN: &str = "hivemind_exp.gsm8k.train_single_gpu";
pub const DEFAULT_MONITOR_LOG: &str = "monitor.log";
pub const DEFAULT_SHELL: &str = "sh";
pub const DEFAULT_CREDENTIAL_ENV: &str = "HF_TOKEN";
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;
