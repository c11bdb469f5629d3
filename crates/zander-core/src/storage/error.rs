//! Storage error handling
//!
//! The persistence boundary is the only place in the core that fails.
//! Every failure is a typed value with a stable code string; domain and
//! tree functions degrade to no-ops or fallbacks instead of erroring.

use thiserror::Error;

/// Errors raised by the persistence boundary
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage medium cannot be probed or used at all
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    /// Persisted payload exists but cannot be parsed (load only)
    #[error("stored state is not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    /// The medium accepted the probe but the actual write failed (save only)
    #[error("write failed: {message}")]
    WriteFailed { message: String },

    /// An import bundle's version tag does not match the supported version
    #[error("unsupported export bundle version: {version}")]
    VersionUnsupported { version: String },
}

impl StorageError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Unavailable { .. } => "storage-unavailable",
            StorageError::InvalidJson { .. } => "invalid-json",
            StorageError::WriteFailed { .. } => "write-failed",
            StorageError::VersionUnsupported { .. } => "version-unsupported",
        }
    }

    pub(crate) fn unavailable(message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            message: message.into(),
        }
    }

    pub(crate) fn write_failed(message: impl Into<String>) -> Self {
        StorageError::WriteFailed {
            message: message.into(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            StorageError::unavailable("probe failed").code(),
            "storage-unavailable"
        );
        assert_eq!(StorageError::write_failed("disk full").code(), "write-failed");
        assert_eq!(
            StorageError::VersionUnsupported {
                version: "other-v2".to_string()
            }
            .code(),
            "version-unsupported"
        );

        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        assert_eq!(
            StorageError::InvalidJson { source: parse_err }.code(),
            "invalid-json"
        );
    }

    #[test]
    fn test_error_display_carries_context() {
        let err = StorageError::VersionUnsupported {
            version: "other-v2".to_string(),
        };
        assert!(err.to_string().contains("other-v2"));
    }
}
