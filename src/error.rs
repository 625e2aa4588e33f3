//! Topic loading error types.
//!
//! Every failure of the topic store, the renderer or the index builder is a
//! [`TopicError`]. Handlers classify it into an HTTP status via
//! [`TopicError::status_code`]; the detail only ever reaches the log.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Topic-related errors
#[derive(Debug, Error)]
pub enum TopicError {
    /// The topic folder or its `page.md` does not exist.
    #[error("topic file `{0}` not found")]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),

    /// Missing blank-line separator, empty body, or unparseable front-matter.
    #[error("invalid topic data in `{path}`: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },
}

impl TopicError {
    /// Wrap an IO error, keeping missing files distinguishable from other failures.
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io(path, err),
        }
    }

    pub fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status for this error: 404 for missing resources, 500 otherwise.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Io(..) | Self::InvalidFormat { .. } => 500,
        }
    }
}
