//! Typed error handling for declscope.
//!
//! Every failure that aborts a run carries the path it happened at, so the
//! batch driver can report it without further context.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for declscope operations.
#[derive(Error, Debug)]
pub enum DeclscopeError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The manifest could not be read or is unusable
    #[error("Manifest error at {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// A manifest entry maps to a path outside the mirror roots
    #[error("Invalid mirror path '{entry}': {message}")]
    Path { entry: String, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DeclscopeError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a manifest error.
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a path error for a manifest entry.
    pub fn path(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Path {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// True when the error means a required input is missing.
    pub fn is_missing_input(&self) -> bool {
        match self {
            Self::Io {
                source: Some(err), ..
            } => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Get the filesystem path associated with this error, if any.
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Manifest { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for declscope results.
pub type DeclscopeResult<T> = Result<T, DeclscopeError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeclscopeResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeclscopeResult<T> {
        self.map_err(|e| DeclscopeError::io(path, e))
    }
}
