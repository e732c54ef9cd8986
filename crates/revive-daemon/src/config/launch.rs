use revive_types::CREDENTIAL_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::constants::{DEFAULT_CREDENTIAL_ENV, DEFAULT_SHELL};

/// How the start script is invoked on restart.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Interpreter that runs the script; the script path is its first argument.
    pub shell: String,
    /// Extra arguments appended after the script path.
    pub args: Vec<String>,
    /// Extra environment for the launched process.
    pub env: BTreeMap<String, String>,
    /// Variable the credential is exported as.
    pub credential_env: Option<String>,
    #[serde(skip_serializing)]
    pub credential: Option<String>,
    /// Lines written to the script's stdin right after launch.
    pub stdin_answers: Vec<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
            credential_env: Some(DEFAULT_CREDENTIAL_ENV.to_string()),
            credential: None,
            stdin_answers: vec!["y".to_string(), CREDENTIAL_PLACEHOLDER.to_string()],
        }
    }
}

impl LaunchConfig {
    /// Environment handed to the launched process: `env` plus the exported credential.
    pub fn environment(&self) -> BTreeMap<String, String> {
        let mut env = self.env.clone();
        if let (Some(name), Some(value)) = (&self.credential_env, &self.credential) {
            env.insert(name.clone(), value.clone());
        }
        env
    }

    /// Bytes piped into the script's stdin, one answer per line.
    pub fn stdin_payload(&self) -> Vec<u8> {
        let credential = self.credential.as_deref().unwrap_or("");
        let mut payload = String::new();
        for answer in &self.stdin_answers {
            payload.push_str(&answer.replace(CREDENTIAL_PLACEHOLDER, credential));
            payload.push('\n');
        }
        payload.into_bytes()
    }

    pub fn needs_credential(&self) -> bool {
        self.stdin_answers
            .iter()
            .any(|a| a.contains(CREDENTIAL_PLACEHOLDER))
    }
}
