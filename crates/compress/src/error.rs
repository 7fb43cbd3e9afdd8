//! Compression Error Types

use derive_more::{Display, Error};

/// A compression error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for compression operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What a caller can do about a failed compression call.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An encoder could not finish its output.
    #[display("encoder failed")]
    Encoder,
    /// Input is not valid data of the format it was decoded as.
    #[display("invalid or corrupted data")]
    InvalidData,
    /// No format goes by this name.
    #[display("unsupported format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// The format exists but this build leaves it out.
    #[display("disabled format: {_0}")]
    DisabledFormat(#[error(not(source))] String),
    /// Writing compressed output failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Encoder, "encoder failed", false)]
    #[case(ErrorKind::InvalidData, "invalid or corrupted data", false)]
    #[case(ErrorKind::UnsupportedFormat("zstd".to_string()), "unsupported format: zstd", false)]
    #[case(ErrorKind::Io, "I/O error", true)]
    fn describes_kinds(#[case] kind: ErrorKind, #[case] message: &str, #[case] retryable: bool) {
        assert_eq!(kind.to_string(), message);
        assert_eq!(kind.is_retryable(), retryable);
    }
}
