use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Integer identifier of a specific revision of a legal document, as used by
/// the `doc_id` query parameter on legis.md.
///
/// Identifiers are assigned in publication order, so a larger id is a more
/// recent version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(u64);
impl DocumentId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}
