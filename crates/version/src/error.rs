//! Version Error Types

use derive_more::{Display, Error};

/// A version parsing error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for version parsing.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("version string is empty")]
    Empty,
    /// The part before `:` is not a non-negative integer.
    #[display("invalid epoch in version: {_0}")]
    InvalidEpoch(#[error(not(source))] String),
    #[display("missing upstream version in: {_0}")]
    MissingUpstream(#[error(not(source))] String),
    #[display("whitespace in version: {_0}")]
    Whitespace(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A version string is either well-formed or it isn't.
        false
    }
}
