//! Gate configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Configuration for a vigil gate daemon.
///
/// Can be loaded from a TOML file via [`GateConfig::from_toml_file`] or built
/// programmatically (e.g. for tests). `admin` and `submodule` have no
/// defaults; everything else does.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateConfig {
    /// Administrator identity (hex address). Gates every configuration change.
    pub admin: String,

    /// Initial active submodule identity (hex address).
    pub submodule: String,

    /// Fraud votes strictly above this count disqualify the submodule.
    #[serde(default = "default_vote_threshold")]
    pub vote_threshold: u64,

    /// Fraud window in seconds. Default: 7 days.
    #[serde(default = "default_fraud_window_secs")]
    pub fraud_window_secs: u64,

    /// Initial watcher identities (hex addresses).
    #[serde(default)]
    pub watchers: Vec<String>,

    /// Submodule oracle endpoints: hex address -> base URL.
    #[serde(default)]
    pub oracles: HashMap<String, String>,

    /// Per-request timeout for oracle calls, in seconds.
    #[serde(default = "default_oracle_timeout_secs")]
    pub oracle_timeout_secs: u64,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Emit JSON-formatted logs instead of human-readable ones.
    #[serde(default)]
    pub log_json: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file: {0}")]
    Io(String),

    #[error("config parse: {0}")]
    Parse(String),
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_vote_threshold() -> u64 {
    1
}

fn default_fraud_window_secs() -> u64 {
    7 * 86_400
}

fn default_oracle_timeout_secs() -> u64 {
    10
}

fn default_rpc_port() -> u16 {
    8045
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GateConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("GateConfig is always serializable to TOML")
    }
}
