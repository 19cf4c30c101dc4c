use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use exn::OptionExt;
use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser as Driver, LaunchOptions, Tab};
use tracing::instrument;

use crate::consts::{BLOCK_LINKS, DEFAULT_WAIT};
use crate::error::{DriverResultExt, ErrorKind, Result};
use crate::page::{Browser, Page};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Evaluates to `true` when the element is absent or not rendered. Called
/// with the element id as its only argument.
const HIDDEN_PROBE: &str = r#"(id => {
    const el = document.getElementById(id);
    if (!el) return true;
    const style = window.getComputedStyle(el);
    return style.display === 'none' || style.visibility === 'hidden' || el.getClientRects().length === 0;
})"#;

/// Remembers the element it is called on as the link about to be activated.
const MARK_ACTIVATED: &str = "function() { window.__legisActivated = this; }";
/// `true` once the remembered link is gone, either because a new document
/// replaced the old one or because the block was re-rendered.
const ACTIVATED_GONE: &str = "!(window.__legisActivated && window.__legisActivated.isConnected)";

/// A Chrome/Chromium executable, driven over the DevTools protocol.
#[derive(Debug, Clone)]
pub struct Chrome {
    executable: PathBuf,
    headless: bool,
    navigation_wait: Duration,
}
impl Chrome {
    /// Searches `PATH` for a Chrome or Chromium executable.
    pub fn discover(headless: bool) -> Result<Self> {
        let executables = ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"];
        for exe in executables {
            if let Ok(executable) = which::which(exe) {
                tracing::debug!(executable = %executable.display(), "Discovered Chrome executable");
                return Ok(Self::with_executable(executable, headless));
            }
        }
        // Flatpak installs cannot be handed to the driver; they need a real binary path.
        tracing::info!("Chrome executable not found in PATH");
        exn::bail!(ErrorKind::BrowserNotFound);
    }

    pub fn with_executable(executable: impl Into<PathBuf>, headless: bool) -> Self {
        Self {
            executable: executable.into(),
            headless,
            navigation_wait: DEFAULT_WAIT,
        }
    }

    /// Upper bound on waiting for an activated link to load its page.
    pub fn with_navigation_wait(mut self, wait: Duration) -> Self {
        self.navigation_wait = wait;
        self
    }
}
impl Browser for Chrome {
    #[instrument(skip(self), fields(executable = %self.executable.display(), headless = self.headless))]
    fn launch(&self) -> Result<Box<dyn Page>> {
        let options = LaunchOptions::default_builder()
            .headless(self.headless)
            .path(Some(self.executable.clone()))
            .build()
            .or_driver(|| ErrorKind::Launch)?;
        let driver = Driver::new(options).or_driver(|| ErrorKind::Launch)?;
        let tab = driver.new_tab().or_driver(|| ErrorKind::Launch)?;
        tracing::debug!("Browser session started");
        Ok(Box::new(ChromeSession {
            tab,
            driver: Some(driver),
            navigation_wait: self.navigation_wait,
        }))
    }
}

/// One tab of a running browser. The browser process ends when the session
/// is closed or dropped.
struct ChromeSession {
    tab: Arc<Tab>,
    driver: Option<Driver>,
    navigation_wait: Duration,
}
impl ChromeSession {
    fn link_selector(block_id: &str) -> String {
        format!("#{block_id} > {BLOCK_LINKS}")
    }
}
impl Page for ChromeSession {
    fn open(&mut self, url: &str) -> Result<()> {
        self.tab.navigate_to(url).or_driver(|| ErrorKind::Driver)?;
        self.tab.wait_until_navigated().or_driver(|| ErrorKind::Driver)?;
        Ok(())
    }

    fn wait_until_hidden(&mut self, element_id: &str, timeout: Duration) -> Result<()> {
        let probe = format!("{HIDDEN_PROBE}({element_id:?})");
        let tab = &self.tab;
        let hidden = poll_until(timeout, || {
            let value = tab.evaluate(&probe, false).or_driver(|| ErrorKind::Driver)?.value;
            Ok(value.and_then(|value| value.as_bool()).unwrap_or(false))
        })?;
        if !hidden {
            exn::bail!(ErrorKind::Timeout(element_id.to_string()));
        }
        Ok(())
    }

    fn block_links(&mut self, block_id: &str) -> Result<Option<Vec<String>>> {
        let block = found(self.tab.find_element(&format!("#{block_id}")))?;
        if block.is_none() {
            tracing::debug!(block = block_id, "Block not on page");
            return Ok(None);
        }
        // The driver reports an empty match as an absent element.
        let Some(links) = found(self.tab.find_elements(&Self::link_selector(block_id)))? else {
            tracing::debug!(block = block_id, "No links matched in block");
            return Ok(Some(Vec::new()));
        };
        let mut texts = Vec::with_capacity(links.len());
        for link in &links {
            let text = link.get_inner_text().or_driver(|| ErrorKind::Driver)?;
            texts.push(text.trim().to_string());
        }
        Ok(Some(texts))
    }

    fn activate(&mut self, block_id: &str, index: usize) -> Result<()> {
        let stale = || ErrorKind::StaleLink {
            block: block_id.to_string(),
            index,
        };
        let links = found(self.tab.find_elements(&Self::link_selector(block_id)))?.ok_or_raise(stale)?;
        let link = links.get(index).ok_or_raise(stale)?;
        let before = self.tab.get_url();
        link.call_js_fn(MARK_ACTIVATED, Vec::new(), false).or_driver(|| ErrorKind::Driver)?;
        link.click().or_driver(|| ErrorKind::Driver)?;

        // Clicking returns as soon as the event is dispatched.
        let tab = &self.tab;
        let left = poll_until(self.navigation_wait, || {
            if tab.get_url() != before {
                return Ok(true);
            }
            // Evaluation fails while the old execution context is torn down.
            let gone = tab.evaluate(ACTIVATED_GONE, false).ok().and_then(|remote| remote.value);
            Ok(gone.and_then(|value| value.as_bool()).unwrap_or(false))
        })?;
        if !left {
            exn::bail!(ErrorKind::NoNavigation {
                block: block_id.to_string(),
                index,
            });
        }
        self.tab.wait_until_navigated().or_driver(|| ErrorKind::Driver)?;
        tracing::debug!(block = block_id, index, url = %self.tab.get_url(), "Link activated");
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    fn close(&mut self) -> Result<()> {
        let closed = self.tab.close(true).or_driver(|| ErrorKind::Driver);
        // Dropping the driver terminates the browser process regardless.
        self.driver.take();
        closed.map(|_| ())
    }
}

/// `None` when the driver could not find the element, every other driver
/// failure is raised.
fn found<T>(result: std::result::Result<T, anyhow::Error>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.downcast_ref::<NoElementFound>().is_some() => Ok(None),
        Err(err) => Err(err).or_driver(|| ErrorKind::Driver),
    }
}

/// Calls `done` every [`POLL_INTERVAL`] until it reports `true` or `timeout`
/// has elapsed. `done` is always called at least once.
fn poll_until<F>(timeout: Duration, mut done: F) -> Result<bool>
where
    F: FnMut() -> Result<bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if done()? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
