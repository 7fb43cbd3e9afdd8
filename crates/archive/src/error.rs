//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Apart from [`ErrorKind::Io`], every variant means the archive itself is
/// broken and reading it again will not help.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be opened or hashed.
    #[display("I/O error")]
    Io,
    /// The file is not an `ar` container.
    #[display("not a package archive")]
    NotAnArchive,
    /// A required archive member is absent.
    #[display("missing archive member: {_0}")]
    MissingMember(#[error(not(source))] &'static str),
    /// The control tarball has no `control` file.
    #[display("control tarball has no control file")]
    MissingControl,
    /// The control member uses a compression that isn't available.
    #[display("unsupported archive member: {_0}")]
    UnsupportedMember(#[error(not(source))] String),
    /// The control tarball or control file could not be read.
    #[display("unreadable control metadata")]
    Control,
    /// A required control field is missing or empty.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    #[display("invalid version: {_0}")]
    InvalidVersion(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}
