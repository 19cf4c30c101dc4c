mod checker;
pub mod error;
mod hooks;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod models;

pub use crate::checker::Checker;
pub use crate::hooks::{Notifier, NullNotifier, NullStore, VersionSource, VersionStore};
pub use crate::models::{DEFAULT_BASE_URL, DEFAULT_VERSION_ID, Outcome, VersionRecord};
