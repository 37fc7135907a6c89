//! GitHub registry errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

use chainreg_protocols::RegistryError;

/// Errors raised while acquiring or reading a repository archive.
///
/// Cloneable so one failed download can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum GithubRegistryError {
    #[error("Invalid repository URI {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Fetch failed for {url}: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// Every archive candidate answered 404.
    #[error("No archive of {repository} found for ref {reference}")]
    ArchiveNotFound {
        repository: String,
        reference: String,
    },

    #[error("GitHub API rate limit exhausted")]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("Invalid archive: {0}")]
    Archive(String),
}

impl From<GithubRegistryError> for RegistryError {
    fn from(err: GithubRegistryError) -> Self {
        let message = err.to_string();
        match err {
            GithubRegistryError::InvalidUri { .. } => RegistryError::InvalidArgument(message),
            GithubRegistryError::Request { .. } => RegistryError::Network(message),
            GithubRegistryError::Status {
                url,
                status,
                reason,
            } => RegistryError::Fetch {
                url,
                status,
                reason,
            },
            GithubRegistryError::ArchiveNotFound { .. } => RegistryError::NotFound(message),
            GithubRegistryError::RateLimited { reset_at } => RegistryError::RateLimited { reset_at },
            GithubRegistryError::Archive(_) => RegistryError::Archive(message),
        }
    }
}
