//! Control-file Error Types

use derive_more::{Display, Error};

/// A parsing error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for control-file parsing.
pub type Result<T> = std::result::Result<T, Error>;

/// Each variant carries the offending (1-based) line number.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field line without a `:` separator.
    #[display("line {_0}: expected `Key: value`")]
    MissingColon(#[error(not(source))] usize),
    /// A continuation line before any field.
    #[display("line {_0}: continuation line without a field")]
    OrphanContinuation(#[error(not(source))] usize),
    #[display("line {_0}: empty field name")]
    EmptyKey(#[error(not(source))] usize),
    /// Input holds more than the single paragraph that was asked for.
    #[display("line {_0}: expected a single paragraph")]
    MultipleParagraphs(#[error(not(source))] usize),
    /// An apt.conf declaration that is not `Key value;`.
    #[display("line {_0}: malformed declaration")]
    Declaration(#[error(not(source))] usize),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
