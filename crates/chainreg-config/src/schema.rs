//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registries in precedence order; later entries win on merge.
    #[serde(default = "default_registries")]
    pub registries: Vec<RegistrySource>,

    #[serde(default)]
    pub overrides: OverridesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            registries: default_registries(),
            overrides: OverridesConfig::default(),
        }
    }
}

fn default_registries() -> Vec<RegistrySource> {
    vec![RegistrySource {
        read_only: true,
        ..RegistrySource::github()
    }]
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    Filesystem,
    Github,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filesystem => f.write_str("filesystem"),
            Self::Github => f.write_str("github"),
        }
    }
}

/// One `[[registries]]` entry.
///
/// Unset GitHub fields fall back to the backend's defaults (the public
/// registry on `main` via `api.github.com`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySource {
    #[serde(rename = "type")]
    pub kind: RegistryKind,

    /// Wrap the registry so writes are skipped.
    #[serde(default)]
    pub read_only: bool,

    /// Registry root (filesystem).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Repository URL (github).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl RegistrySource {
    pub fn filesystem(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: RegistryKind::Filesystem,
            path: Some(path.into()),
            ..Self::github()
        }
    }

    pub fn github() -> Self {
        Self {
            kind: RegistryKind::Github,
            read_only: false,
            path: None,
            uri: None,
            branch: None,
            auth_token: None,
            api_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

/// Inline chain data layered above every configured registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverridesConfig {
    /// Partial metadata per chain, deep-merged over registry data.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,

    #[serde(default)]
    pub addresses: BTreeMap<String, BTreeMap<String, String>>,
}

impl OverridesConfig {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.addresses.is_empty()
    }
}
