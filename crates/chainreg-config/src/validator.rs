//! Configuration validation.

use std::fmt;

use crate::schema::{Config, RegistryKind, RegistrySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One finding about a config field, addressed by its TOML path.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Default)]
struct Issues(Vec<ConfigIssue>);

impl Issues {
    fn push(&mut self, severity: Severity, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(ConfigIssue {
            severity,
            path: path.into(),
            message: message.into(),
        });
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, path, message);
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, path, message);
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Check `config`; the result is valid when no issue is an error.
    pub fn validate(config: &Config) -> Vec<ConfigIssue> {
        let mut issues = Issues::default();

        Self::validate_logging(config, &mut issues);

        if config.registries.is_empty() {
            issues.error("registries", "At least one registry must be configured");
        }
        for (i, source) in config.registries.iter().enumerate() {
            let prefix = format!("registries[{}]", i);
            match source.kind {
                RegistryKind::Filesystem => Self::validate_filesystem(&prefix, source, &mut issues),
                RegistryKind::Github => Self::validate_github(&prefix, source, &mut issues),
            }
        }

        Self::validate_overrides(config, &mut issues);

        issues.0
    }

    fn validate_logging(config: &Config, issues: &mut Issues) {
        if config.logging.level.trim().is_empty() {
            issues.error("logging.level", "Log level cannot be empty");
        }
    }

    fn validate_filesystem(prefix: &str, source: &RegistrySource, issues: &mut Issues) {
        match &source.path {
            None => issues.error(
                format!("{}.path", prefix),
                "Filesystem registry requires a path",
            ),
            Some(path) if !path.exists() => issues.warn(
                format!("{}.path", prefix),
                format!("Registry path does not exist yet: {}", path.display()),
            ),
            Some(_) => {}
        }

        for (field, set) in [
            ("uri", source.uri.is_some()),
            ("branch", source.branch.is_some()),
            ("auth_token", source.auth_token.is_some()),
        ] {
            if set {
                issues.warn(
                    format!("{}.{}", prefix, field),
                    "Ignored for filesystem registries",
                );
            }
        }
    }

    fn validate_github(prefix: &str, source: &RegistrySource, issues: &mut Issues) {
        for (field, url) in [("uri", &source.uri), ("api_url", &source.api_url)] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    issues.error(
                        format!("{}.{}", prefix, field),
                        format!("{} must start with http:// or https://", field),
                    );
                }
            }
        }

        if source.branch.as_deref().is_some_and(|b| b.trim().is_empty()) {
            issues.error(format!("{}.branch", prefix), "Branch cannot be empty");
        }

        if source.timeout_seconds == 0 {
            issues.error(
                format!("{}.timeout_seconds", prefix),
                "timeout_seconds must be greater than 0",
            );
        }

        if source.auth_token.as_deref().is_none_or(str::is_empty) {
            issues.warn(
                format!("{}.auth_token", prefix),
                "No auth token set, archive downloads use the anonymous rate limit",
            );
        }

        if source.path.is_some() {
            issues.warn(format!("{}.path", prefix), "Ignored for github registries");
        }
    }

    fn validate_overrides(config: &Config, issues: &mut Issues) {
        for (chain, metadata) in &config.overrides.metadata {
            if !metadata.is_object() {
                issues.error(
                    format!("overrides.metadata.{}", chain),
                    "Metadata override must be a table",
                );
            }
        }
        for (chain, addresses) in &config.overrides.addresses {
            if addresses.is_empty() {
                issues.warn(
                    format!("overrides.addresses.{}", chain),
                    "Empty address override has no effect",
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
