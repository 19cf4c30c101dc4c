//! Capabilities the discovery procedure needs from a browser.

use std::time::Duration;

use crate::error::Result;

/// A live page inside a browser session.
///
/// Blocks and elements are addressed by their DOM `id`. Links are addressed
/// by their position inside a block, as returned by
/// [`block_links()`](Self::block_links), so implementations never need to hand
/// out element handles tied to the session's lifetime.
pub trait Page {
    /// Loads `url` in the session.
    fn open(&mut self, url: &str) -> Result<()>;

    /// Blocks until the element with `element_id` is absent or invisible.
    ///
    /// Returns [`ErrorKind::Timeout`](crate::error::ErrorKind::Timeout) if it
    /// is still visible once `timeout` has passed.
    fn wait_until_hidden(&mut self, element_id: &str, timeout: Duration) -> Result<()>;

    /// Text of each `ul > li > a` link inside the block, in document order.
    ///
    /// Returns `None` if the block itself is not on the page.
    fn block_links(&mut self, block_id: &str) -> Result<Option<Vec<String>>>;

    /// Clicks the link at `index` inside the block.
    fn activate(&mut self, block_id: &str, index: usize) -> Result<()>;

    /// URL of the page currently loaded.
    fn current_url(&mut self) -> Result<String>;

    /// Releases the session. Further calls may fail.
    fn close(&mut self) -> Result<()>;
}

/// Something that can open fresh [`Page`] sessions.
pub trait Browser {
    fn launch(&self) -> Result<Box<dyn Page>>;
}
