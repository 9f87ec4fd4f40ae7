//! Error type shared by the graph builder, the validator and the ACL engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AclError>;

/// Coarse classification of an [`AclError`].
///
/// Request layers map these to status codes: `NotFound`, `Incompatible`, `Unsupported`
/// and `Missed` are caller-input problems, `Invalid` is a definition problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclErrorKind {
    NotFound,
    Incompatible,
    Unsupported,
    Missed,
    Invalid,
}

/// Errors raised while building the workspace graph or validating an ACL request.
///
/// A denied operation is never an error; it is reported through
/// [`Decision::allowed`](crate::Decision).
#[derive(Debug, Error)]
pub enum AclError {
    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("incompatible: {reason}")]
    Incompatible { reason: String },

    #[error("unsupported: {what}")]
    Unsupported { what: String },

    #[error("missed: {what}")]
    Missed { what: String },

    #[error("invalid definition: {reason}")]
    Invalid { reason: String },

    // fs-err already names the path in `source`
    #[error("failed to read options: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
}

impl AclError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub(crate) fn incompatible(reason: impl Into<String>) -> Self {
        Self::Incompatible {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported { what: what.into() }
    }

    pub(crate) fn missed(what: impl Into<String>) -> Self {
        Self::Missed { what: what.into() }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> AclErrorKind {
        match self {
            Self::NotFound { .. } => AclErrorKind::NotFound,
            Self::Incompatible { .. } => AclErrorKind::Incompatible,
            Self::Unsupported { .. } => AclErrorKind::Unsupported,
            Self::Missed { .. } => AclErrorKind::Missed,
            Self::Invalid { .. } | Self::Io { .. } | Self::Json(_) => AclErrorKind::Invalid,
        }
    }
}
