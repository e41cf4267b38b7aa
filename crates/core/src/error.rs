//! Core error types for memhunt operations.
//!
//! Every failure in the workspace is one of the variants below. Callers match
//! on [`Error::kind`] to decide how a failure surfaces (payload, HTTP status,
//! or success-with-message).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Core error type for memhunt operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Inspection errors
    #[error("inspection backend failed during {operation}: {reason}")]
    BackendFailure {
        operation: &'static str,
        reason: String,
    },

    #[error("{reason}")]
    EmptyResult { reason: String },

    #[error("internal failure: {reason}")]
    FacadeFailure { reason: String },

    #[error("liveness probe failed: {reason}")]
    LivenessFailure { reason: String },

    // Configuration errors
    #[error("failed to read file '{path}': {reason}")]
    FileReadFailed { path: PathBuf, reason: String },

    #[error("TOML parse error: {reason}")]
    TomlParseFailed { reason: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The inspection backend raised or returned an error.
    BackendFailure,
    /// Nothing to report. Not a failure.
    EmptyResult,
    /// Something unexpected escaped the reporter boundary.
    FacadeFailure,
    /// The liveness probe could not enumerate objects.
    LivenessFailure,
    /// Configuration could not be loaded or validated.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackendFailure => write!(f, "backend_failure"),
            Self::EmptyResult => write!(f, "empty_result"),
            Self::FacadeFailure => write!(f, "facade_failure"),
            Self::LivenessFailure => write!(f, "liveness_failure"),
            Self::Config => write!(f, "config"),
        }
    }
}

impl Error {
    /// Create a backend failure for the named operation.
    pub fn backend_failure(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::BackendFailure {
            operation,
            reason: reason.into(),
        }
    }

    /// Create an empty-result marker.
    pub fn empty_result(reason: impl Into<String>) -> Self {
        Self::EmptyResult {
            reason: reason.into(),
        }
    }

    /// Create a facade failure.
    pub fn facade_failure(reason: impl Into<String>) -> Self {
        Self::FacadeFailure {
            reason: reason.into(),
        }
    }

    /// Create a liveness failure.
    pub fn liveness_failure(reason: impl Into<String>) -> Self {
        Self::LivenessFailure {
            reason: reason.into(),
        }
    }

    /// Create a file read error.
    pub fn file_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a TOML parse error.
    pub fn toml_parse_failed(reason: impl Into<String>) -> Self {
        Self::TomlParseFailed {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BackendFailure { .. } => ErrorKind::BackendFailure,
            Self::EmptyResult { .. } => ErrorKind::EmptyResult,
            Self::FacadeFailure { .. } => ErrorKind::FacadeFailure,
            Self::LivenessFailure { .. } => ErrorKind::LivenessFailure,
            Self::FileReadFailed { .. }
            | Self::TomlParseFailed { .. }
            | Self::InvalidConfig { .. } => ErrorKind::Config,
        }
    }
}
