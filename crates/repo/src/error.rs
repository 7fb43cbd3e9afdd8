//! Repository Build Error Types

use derive_more::{Display, Error};
use shelf_compress::Compression;
use std::path::PathBuf;

/// A repository build error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong while building or reading a repository.
///
/// Every variant other than [`ErrorKind::Configuration`] names the file it
/// concerns; the frames below it in the error tree carry the cause.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The build was asked for something it cannot do, such as producing no
    /// index at all or a format without a registered codec. Raised before any
    /// I/O.
    #[display("invalid build configuration")]
    Configuration,
    /// A manifest or index file that must exist does not.
    #[display("not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// A package archive could not be read or lacks required metadata.
    #[display("malformed package archive: {}", _0.display())]
    MalformedArchive(#[error(not(source))] PathBuf),
    /// A manifest, index or apt.conf file is not valid control data.
    #[display("malformed control data: {}", _0.display())]
    Malformed(#[error(not(source))] PathBuf),
    /// Reading, writing or hashing a file failed.
    #[display("I/O failure on {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// A codec failed to compress or decompress index data.
    #[display("{_0} codec failed")]
    Compression(#[error(not(source))] Compression),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io(_))
    }
}
