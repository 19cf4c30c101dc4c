//! Recording fetcher for testing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use legis_navigate::DocumentId;

use crate::error::{ErrorKind, Result};
use crate::{Fetch, file_name};

/// A [`Fetch`] that records requested ids instead of touching the network.
///
/// Clones share their record, so a test can keep one handle and give the
/// other away.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    fetched: Arc<Mutex<Vec<DocumentId>>>,
    failing: bool,
}
impl MockFetcher {
    /// A fetcher whose every download fails with a server error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Ids requested so far, across all clones.
    pub fn fetched(&self) -> Vec<DocumentId> {
        self.fetched.lock().map(|ids| ids.clone()).unwrap_or_default()
    }
}
impl Fetch for MockFetcher {
    fn fetch(&self, id: DocumentId) -> Result<PathBuf> {
        if let Ok(mut ids) = self.fetched.lock() {
            ids.push(id);
        }
        if self.failing {
            exn::bail!(ErrorKind::Status(500));
        }
        Ok(file_name(id))
    }
}
