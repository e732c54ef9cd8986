use super::commands::OutputFormat;
use revive_daemon::{build_probe, ProcessProbe, SupervisorConfig};
use revive_types::ReviveResult;
use tracing::warn;

/// Prints one liveness answer. A failed query is reported, not turned into a failing exit.
pub async fn run_check(config: &SupervisorConfig, format: &OutputFormat) -> ReviveResult<()> {
    let probe = build_probe(config);
    let _ = check_with(probe.as_ref(), config, format).await;
    Ok(())
}

async fn check_with(
    probe: &dyn ProcessProbe,
    config: &SupervisorConfig,
    format: &OutputFormat,
) -> ReviveResult<Vec<u32>> {
    let result = probe.matching_pids(&config.process_pattern).await;
    if let Err(ref e) = result {
        warn!("Liveness query failed: {}", e);
    }

    match format {
        OutputFormat::Json => {
            let body = match &result {
                Ok(pids) => serde_json::json!({
                    "pattern": config.process_pattern,
                    "probe": config.probe.to_string(),
                    "running": !pids.is_empty(),
                    "pids": pids,
                }),
                Err(e) => serde_json::json!({
                    "pattern": config.process_pattern,
                    "probe": config.probe.to_string(),
                    "running": false,
                    "error": e.to_string(),
                }),
            };
            println!("{}", body);
        }
        OutputFormat::Text => match &result {
            Ok(pids) if !pids.is_empty() => {
                let list: Vec<String> = pids.iter().map(u32::to_string).collect();
                println!(
                    "\x1b[38;5;46m[+]\x1b[0m '{}' is running (pid {})",
                    config.process_pattern,
                    list.join(", ")
                );
            }
            Ok(_) => {
                println!(
                    "\x1b[38;5;196m[-]\x1b[0m '{}' is not running",
                    config.process_pattern
                );
            }
            Err(e) => {
                println!(
                    "\x1b[38;5;226m[!]\x1b[0m Could not query processes ({}); the watchdog would restart",
                    e
                );
            }
        },
    }

    result
}
