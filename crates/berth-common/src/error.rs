//! Unified error types for the berth workspace.
//!
//! Every fallible operation in the translation core returns [`BerthError`].
//! The CLI wraps these in `anyhow` at the command boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BerthError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A descriptor entry is missing a required field or carries a value of
    /// the wrong shape.
    #[error("malformed descriptor entry {definition}: {message}")]
    MalformedDescriptor {
        /// Name of the offending definition, its list position when the name
        /// itself is missing, or the top-level key at fault.
        definition: String,
        /// Description of the problem.
        message: String,
    },

    /// The descriptor declares a version this translator does not handle.
    #[error("unsupported descriptor version: {}", found.as_deref().unwrap_or("<missing>"))]
    UnsupportedDescriptorVersion {
        /// Version marker found in the document, if any.
        found: Option<String>,
    },

    /// A container name contains no ASCII letters or digits.
    #[error("container name \"{name}\" has no alphanumeric characters to form a service name")]
    Sanitization {
        /// The original container name.
        name: String,
    },

    /// Two container names reduce to the same service name.
    #[error("container names \"{first}\" and \"{second}\" both map to service \"{service}\"")]
    DuplicateService {
        /// The colliding service name.
        service: String,
        /// First container name producing it.
        first: String,
        /// Second container name producing it.
        second: String,
    },

    /// An environment token is not of the form `NAME=VALUE`.
    #[error("invalid environment variable \"{token}\": use the format NAME=VALUE (or NAME= to remove)")]
    MalformedOverlayToken {
        /// The rejected token.
        token: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// YAML serialization failed.
    #[error("YAML error: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },
}

impl BerthError {
    /// Builds an [`BerthError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BerthError>;
