//! Navigation Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A navigation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for navigation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A navigational block is absent; the page structure has changed.
    #[display("no {_0} found")]
    MissingBlock(#[error(not(source))] String),
    /// A navigational block exists but holds no links.
    #[display("{_0} is empty")]
    EmptyBlock(#[error(not(source))] String),
    /// The loading indicator never became invisible within the bounded wait.
    #[display("loading indicator #{_0} did not clear in time")]
    Timeout(#[error(not(source))] String),
    /// The final page URL carries no `doc_id` parameter.
    #[display("no doc_id found in url: {_0}")]
    DocumentIdNotFound(#[error(not(source))] String),
    /// A `doc_id` parameter was found but is not a usable integer.
    #[display("invalid doc_id: {_0}")]
    InvalidDocumentId(#[error(not(source))] String),
    /// A link disappeared between listing and activation.
    #[display("link {index} of {block} is no longer on the page")]
    StaleLink {
        /// Block the link was listed in.
        block: String,
        /// Position of the link inside the block.
        index: usize,
    },
    /// Activating a link neither changed the URL nor replaced the link.
    #[display("link {index} of {block} did not load a new page")]
    NoNavigation {
        /// Block the link was listed in.
        block: String,
        /// Position of the link inside the block.
        index: usize,
    },
    #[display("chrome/chromium not detected on your system")]
    BrowserNotFound,
    /// The browser process could not be started.
    #[display("unable to launch browser session")]
    Launch,
    /// The browser rejected or failed a protocol command.
    #[display("browser driver failure")]
    Driver,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::NoNavigation { .. } | Self::Launch | Self::Driver)
    }
}

/// Failure reported by the browser driver, flattened to its message.
///
/// The driver reports errors that do not implement [`std::error::Error`], so
/// they are captured as text to become the leaf of an error tree.
#[derive(Debug, Display, Error)]
#[display("{_0}")]
pub struct DriverFault(#[error(not(source))] String);

/// Raise driver results into the navigation error tree.
pub(crate) trait DriverResultExt<T> {
    fn or_driver<F>(self, kind: F) -> Result<T>
    where
        F: FnOnce() -> ErrorKind;
}
impl<T, E: std::fmt::Display> DriverResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn or_driver<F>(self, kind: F) -> Result<T>
    where
        F: FnOnce() -> ErrorKind,
    {
        use exn::ResultExt;
        self.map_err(|err| DriverFault(format!("{err:#}"))).or_raise(kind)
    }
}
