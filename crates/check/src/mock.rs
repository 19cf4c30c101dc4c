//! Recording hooks for testing.

use std::sync::{Arc, Mutex};

use legis_navigate::DocumentId;

use crate::error::{ErrorKind, Result};
use crate::hooks::{Notifier, VersionStore};
use crate::models::VersionRecord;

/// A [`VersionStore`] that remembers every save in memory.
///
/// Clones share their record, so a test can keep one handle and give the
/// other to a [`Checker`](crate::Checker).
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    saved: Arc<Mutex<Vec<(String, DocumentId)>>>,
    failing: bool,
}
impl RecordingStore {
    /// A store that refuses every save.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<(String, DocumentId)> {
        self.saved.lock().map(|saved| saved.clone()).unwrap_or_default()
    }
}
impl VersionStore for RecordingStore {
    fn save_new_version(&self, url: &str, version: DocumentId) -> Result<()> {
        if self.failing {
            exn::bail!(ErrorKind::Store);
        }
        if let Ok(mut saved) = self.saved.lock() {
            saved.push((url.to_string(), version));
        }
        Ok(())
    }
}

/// A [`Notifier`] that remembers every announced record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notified: Arc<Mutex<Vec<VersionRecord>>>,
}
impl RecordingNotifier {
    pub fn notified(&self) -> Vec<VersionRecord> {
        self.notified.lock().map(|notified| notified.clone()).unwrap_or_default()
    }
}
impl Notifier for RecordingNotifier {
    fn notify(&self, record: &VersionRecord) -> Result<()> {
        if let Ok(mut notified) = self.notified.lock() {
            notified.push(record.clone());
        }
        Ok(())
    }
}
