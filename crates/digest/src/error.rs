//! Digest Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A digest error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for digest operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be opened.
    #[display("cannot open {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// A read failed part-way through the file.
    #[display("read failed: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// A chunk size of zero would never make progress.
    #[display("chunk size must be greater than zero")]
    ChunkSize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}
