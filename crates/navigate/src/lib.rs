mod chrome;
mod consts;
mod discover;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod models;
mod page;
mod select;

pub use crate::chrome::Chrome;
pub use crate::consts::{DATES_BLOCK_ID, DEFAULT_WAIT, LOADING_INDICATOR_ID, YEARS_BLOCK_ID};
pub use crate::discover::discover;
pub use crate::models::DocumentId;
pub use crate::page::{Browser, Page};
pub use crate::select::{document_id, latest_date, latest_year};
