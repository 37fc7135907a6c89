//! Registry error types.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::registry::{RegistryMethod, RegistryType};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Fetch failed for {url}: {status} {reason}")]
    Fetch {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited, quota resets at {}", describe_reset(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Method {method} is not implemented by the {registry} registry")]
    Unimplemented {
        registry: RegistryType,
        method: RegistryMethod,
    },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn describe_reset(reset_at: &Option<DateTime<Utc>>) -> String {
    reset_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "an unknown time".to_string())
}

/// Human-readable kind of a JSON value, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl RegistryError {
    /// Shorthand for the error raised by backends that cannot perform `method`.
    pub fn unimplemented(registry: RegistryType, method: RegistryMethod) -> Self {
        Self::Unimplemented { registry, method }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = RegistryError::NotFound("chain ethereum".to_string());
        assert!(err.to_string().contains("Not found"));
        assert!(err.to_string().contains("ethereum"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_already_exists_error() {
        let err = RegistryError::AlreadyExists("chain ethereum".to_string());
        assert!(err.to_string().contains("Already exists"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_fetch_error_carries_status() {
        let err = RegistryError::Fetch {
            url: "https://github.com/a/b/archive/main.zip".to_string(),
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("500"));
        assert!(display.contains("archive/main.zip"));
    }

    #[test]
    fn test_rate_limited_with_reset() {
        let reset = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let err = RegistryError::RateLimited {
            reset_at: Some(reset),
        };
        assert!(err.to_string().contains("2023-11-14"));
    }

    #[test]
    fn test_rate_limited_without_reset() {
        let err = RegistryError::RateLimited { reset_at: None };
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_unimplemented_names_method() {
        let err = RegistryError::unimplemented(RegistryType::Github, RegistryMethod::AddChain);
        let display = err.to_string();
        assert!(display.contains("addChain"));
        assert!(display.contains("github"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RegistryError::from(io_err);
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_serialization_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RegistryError::from(json_err);
        assert!(err.to_string().contains("Serialization error"));
    }
}
