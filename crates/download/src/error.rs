//! Download Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A download error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for download operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be built.
    #[display("unable to build HTTP client")]
    Client,
    /// The request failed before a response arrived (DNS, TLS, timeout...).
    #[display("request to {_0} failed")]
    Request(#[error(not(source))] String),
    /// The server answered with a non-success status.
    #[display("server responded with HTTP {_0}")]
    Status(#[error(not(source))] u16),
    /// The document could not be written to disk.
    #[display("unable to write {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Status(code) => *code >= 500 || *code == 429,
            Self::Client | Self::Write(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Request("https://www.legis.md/".to_string()), true)]
    #[case(ErrorKind::Status(503), true)]
    #[case(ErrorKind::Status(429), true)]
    #[case(ErrorKind::Status(404), false)]
    #[case(ErrorKind::Write(PathBuf::from("108460.pdf")), false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Status(404).to_string(), "server responded with HTTP 404");
        assert_eq!(ErrorKind::Write(PathBuf::from("1.pdf")).to_string(), "unable to write 1.pdf");
    }
}
