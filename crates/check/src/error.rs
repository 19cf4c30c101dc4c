//! Check Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A check error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for check operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the collaborator a check cycle failed in.
///
/// Discovery failures never surface here: they are logged and reported as
/// [`Outcome::NotDiscovered`](crate::Outcome::NotDiscovered).
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The last-known version could not be read.
    #[display("unable to read saved version")]
    Source,
    /// A browser session could not be started.
    #[display("unable to start browser session")]
    Browser,
    /// The new version's PDF could not be downloaded.
    #[display("unable to download new version")]
    Download,
    /// The new version could not be persisted.
    #[display("unable to save new version")]
    Store,
    /// Subscribers could not be notified of the new version.
    #[display("unable to notify about new version")]
    Notify,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Browser | Self::Download)
    }
}
