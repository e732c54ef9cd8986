mod constants;
mod launch;
mod logging;
mod supervisor;
mod types;

pub use constants::*;
pub use launch::LaunchConfig;
pub use logging::LoggingConfig;
pub use supervisor::{RedactedConfig, SupervisorConfig};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_validation() {
        let config = SupervisorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_restarts, 20);
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.grace_period_secs, 30);
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut config = SupervisorConfig::default();
        config.process_pattern = "   ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = SupervisorConfig::default();
        config.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = SupervisorConfig::default();
        config.max_restarts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_grace_allowed() {
        let mut config = SupervisorConfig::default();
        config.grace_period_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_work_dir_rejected() {
        let mut config = SupervisorConfig::default();
        config.work_dir = PathBuf::from("/definitely/not/a/real/revive/dir");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pgrep_argument_mode_rejected() {
        let mut config = SupervisorConfig::default();
        config.probe = ProbeKind::Pgrep;
        config.match_mode = MatchMode::Argument;
        assert!(config.validate().is_err());

        config.match_mode = MatchMode::Substring;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SupervisorConfig::default();
        let rejected = config.apply_overrides_from(lookup(&[
            ("REVIVE_PATTERN", "train.py"),
            ("REVIVE_POLL_INTERVAL", "5"),
            ("REVIVE_MAX_RESTARTS", "3"),
            ("REVIVE_GRACE_SECS", "not-a-number"),
            ("REVIVE_LOG_LEVEL", "DEBUG"),
        ]));

        assert_eq!(config.process_pattern, "train.py");
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.max_restarts, 3);
        assert_eq!(config.grace_period_secs, DEFAULT_GRACE_PERIOD_SECS);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(rejected, vec!["Ignoring invalid REVIVE_GRACE_SECS: not-a-number".to_string()]);
    }

    #[test]
    fn test_invalid_numeric_override_is_reported() {
        let mut config = SupervisorConfig::default();
        let rejected = config.apply_overrides_from(lookup(&[("REVIVE_POLL_INTERVAL", "sixty")]));

        assert_eq!(config.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].contains("REVIVE_POLL_INTERVAL"));
        assert!(rejected[0].contains("sixty"));
    }

    #[test]
    fn test_log_json_override_parses_flag() {
        let cases = [
            ("1", true),
            ("true", true),
            ("ON", true),
            ("0", false),
            ("false", false),
            ("no", false),
        ];
        for (value, expected) in cases {
            let mut config = SupervisorConfig::default();
            config.logging.json = !expected;
            let rejected = config.apply_overrides_from(lookup(&[("REVIVE_LOG_JSON", value)]));
            assert!(rejected.is_empty(), "{} should parse", value);
            assert_eq!(config.logging.json, expected, "REVIVE_LOG_JSON={}", value);
        }

        let mut config = SupervisorConfig::default();
        let rejected = config.apply_overrides_from(lookup(&[("REVIVE_LOG_JSON", "maybe")]));
        assert!(!config.logging.json);
        assert_eq!(rejected, vec!["Ignoring invalid REVIVE_LOG_JSON: maybe".to_string()]);
    }

    #[test]
    fn test_credential_from_named_variable() {
        let mut config = SupervisorConfig::default();
        config.apply_overrides_from(lookup(&[("HF_TOKEN", "hf_secret")]));
        assert_eq!(config.launch.credential.as_deref(), Some("hf_secret"));

        let mut config = SupervisorConfig::default();
        config.apply_overrides_from(lookup(&[
            ("HF_TOKEN", "hf_secret"),
            ("REVIVE_CREDENTIAL", "explicit"),
        ]));
        assert_eq!(config.launch.credential.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_launch_environment_and_stdin() {
        let mut launch = LaunchConfig::default();
        launch.credential = Some("tok".into());
        launch.env.insert("CUDA_VISIBLE_DEVICES".into(), "0".into());

        let env = launch.environment();
        assert_eq!(env.get("HF_TOKEN").map(String::as_str), Some("tok"));
        assert_eq!(env.get("CUDA_VISIBLE_DEVICES").map(String::as_str), Some("0"));
        assert_eq!(launch.stdin_payload(), b"y\ntok\n".to_vec());
    }

    #[test]
    fn test_stdin_without_credential() {
        let launch = LaunchConfig::default();
        assert!(launch.needs_credential());
        assert!(!launch.environment().contains_key("HF_TOKEN"));
        assert_eq!(launch.stdin_payload(), b"y\n\n".to_vec());
    }

    #[test]
    fn test_match_modes() {
        let argv = vec![
            "python".to_string(),
            "-m".to_string(),
            "hivemind_exp.gsm8k.train_single_gpu".to_string(),
        ];
        assert!(MatchMode::Substring.matches("gsm8k.train", &argv));
        assert!(MatchMode::Substring.matches("-m hivemind", &argv));
        assert!(!MatchMode::Argument.matches("gsm8k.train", &argv));
        assert!(MatchMode::Argument.matches("hivemind_exp.gsm8k.train_single_gpu", &argv));
    }

    #[test]
    fn test_redacted_config_hides_credential() {
        let mut config = SupervisorConfig::default();
        config.launch.credential = Some("hf_super_secret".into());
        let rendered = format!("{}", config.redacted());
        assert!(rendered.contains("Credential: ********"));
        assert!(!rendered.contains("hf_super_secret"));
    }

    #[test]
    fn test_config_serialization() {
        let mut config = SupervisorConfig::default();
        config.launch.credential = Some("never-written".into());
        config.max_restarts = 7;

        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
        assert!(!toml_str.contains("never-written"));

        let parsed: SupervisorConfig = toml::from_str(&toml_str).expect("Failed to parse");
        assert_eq!(parsed.max_restarts, 7);
        assert_eq!(parsed.process_pattern, config.process_pattern);
        assert!(parsed.launch.credential.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: SupervisorConfig = toml::from_str(
            r#"
            process_pattern = "worker.py"
            probe = "pgrep"

            [launch]
            shell = "bash"
            "#,
        )
        .expect("Failed to parse");

        assert_eq!(parsed.process_pattern, "worker.py");
        assert_eq!(parsed.probe, ProbeKind::Pgrep);
        assert_eq!(parsed.launch.shell, "bash");
        assert_eq!(parsed.launch.stdin_answers.len(), 2);
        assert_eq!(parsed.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_missing_file_reads_defaults() {
        let config = SupervisorConfig::read("/no/such/revive/config.toml").expect("defaults");
        assert_eq!(config.max_restarts, DEFAULT_MAX_RESTARTS);
    }
}
