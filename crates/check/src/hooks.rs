//! Capabilities a deployment plugs into the check cycle.

use crate::error::Result;
use crate::models::VersionRecord;
use legis_navigate::DocumentId;

/// Supplies the last confirmed version.
pub trait VersionSource {
    fn saved_version(&self) -> Result<VersionRecord>;
}

/// A fixed record is its own source.
impl VersionSource for VersionRecord {
    fn saved_version(&self) -> Result<VersionRecord> {
        Ok(self.clone())
    }
}

/// Persists a newly discovered version for the next run.
pub trait VersionStore {
    fn save_new_version(&self, url: &str, version: DocumentId) -> Result<()>;
}

/// Tells interested parties that a new version exists.
pub trait Notifier {
    fn notify(&self, record: &VersionRecord) -> Result<()>;
}

/// Store that keeps nothing. The next run starts from the same saved
/// version.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;
impl VersionStore for NullStore {
    fn save_new_version(&self, url: &str, version: DocumentId) -> Result<()> {
        tracing::debug!(url, %version, "No version store configured; new version not persisted");
        Ok(())
    }
}

/// Notifier that tells no one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;
impl Notifier for NullNotifier {
    fn notify(&self, record: &VersionRecord) -> Result<()> {
        tracing::debug!(version = %record.version_id, "No notifier configured");
        Ok(())
    }
}
