//! Filesystem registry errors.

use std::path::PathBuf;
use thiserror::Error;

use chainreg_protocols::RegistryError;

#[derive(Debug, Error)]
pub enum FileSystemRegistryError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The blocking directory scan could not complete.
    #[error("Directory scan failed: {0}")]
    Scan(String),
}

impl From<FileSystemRegistryError> for RegistryError {
    fn from(err: FileSystemRegistryError) -> Self {
        let message = err.to_string();
        match err {
            FileSystemRegistryError::Read { path, source }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                RegistryError::NotFound(path.display().to_string())
            }
            FileSystemRegistryError::Read { source, .. }
            | FileSystemRegistryError::Write { source, .. } => {
                RegistryError::Io(std::io::Error::new(source.kind(), message))
            }
            FileSystemRegistryError::Parse { .. } => RegistryError::Yaml(message),
            FileSystemRegistryError::Scan(_) => RegistryError::Io(std::io::Error::other(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = FileSystemRegistryError::Read {
            path: PathBuf::from("/r/chains/ethereum/metadata.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let err: RegistryError = err.into();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ethereum"));
    }

    #[test]
    fn test_write_error_keeps_path() {
        let err = FileSystemRegistryError::Write {
            path: PathBuf::from("/readonly/chains/base/addresses.yaml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let err: RegistryError = err.into();
        assert!(matches!(err, RegistryError::Io(_)));
        assert!(err.to_string().contains("/readonly/chains/base"));
    }

    #[test]
    fn test_parse_error_maps_to_yaml() {
        let err = FileSystemRegistryError::Parse {
            path: PathBuf::from("metadata.yaml"),
            reason: "mapping values are not allowed".to_string(),
        };
        let err: RegistryError = err.into();
        assert!(matches!(err, RegistryError::Yaml(_)));
    }
}
