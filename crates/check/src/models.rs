use std::path::PathBuf;

use legis_navigate::DocumentId;
use serde::{Deserialize, Serialize};

/// Page listing every version of the tracked document; the version id is
/// appended to select one.
pub const DEFAULT_BASE_URL: &str = "https://www.legis.md/cautare/getResults?lang=ro&doc_id=";
/// Most recent version confirmed for the tracked document.
pub const DEFAULT_VERSION_ID: DocumentId = DocumentId::new(108459);

/// The last confirmed version of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionRecord {
    pub base_url: String,
    pub version_id: DocumentId,
}
impl VersionRecord {
    pub fn new(base_url: impl Into<String>, version_id: DocumentId) -> Self {
        Self {
            base_url: base_url.into(),
            version_id,
        }
    }

    /// Page showing this version, the starting point of discovery.
    pub fn page_url(&self) -> String {
        format!("{}{}", self.base_url, self.version_id)
    }

    /// The record replacing this one once `version_id` has been discovered.
    pub fn superseded_by(&self, version_id: DocumentId) -> Self {
        Self::new(self.base_url.clone(), version_id)
    }
}
impl Default for VersionRecord {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_VERSION_ID)
    }
}

/// What a single check cycle concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Discovery failed; the reason has been logged.
    NotDiscovered,
    /// The site offers nothing newer than the saved version.
    UpToDate { saved: DocumentId, latest: DocumentId },
    /// A newer version was found and handed to the store.
    Updated {
        record: VersionRecord,
        /// Where the PDF was written, if downloading is enabled.
        download: Option<PathBuf>,
    },
}
