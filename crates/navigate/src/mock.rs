//! Offline page sessions over static HTML snapshots, for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use crate::consts::BLOCK_LINKS;
use crate::error::{ErrorKind, Result};
use crate::page::{Browser, Page};

/// Something observable a [`FixturePage`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened(String),
    Activated { block: String, text: String },
    Closed,
}

/// A [`Page`] backed by a map of URL to HTML snapshot.
///
/// Activating a link loads the snapshot registered under the link's `href`
/// verbatim; there is no URL resolution. Nothing on a snapshot ever changes,
/// so a loading indicator that is visible when waited on never clears.
///
/// Clones share their event log, which lets a test keep one handle while a
/// [`FixtureBrowser`] hands out the others.
#[derive(Debug, Clone, Default)]
pub struct FixturePage {
    pages: HashMap<String, String>,
    current: Option<String>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl FixturePage {
    /// Registers (or replaces) the snapshot served for `url`.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Everything recorded so far, across all clones.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    fn record(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn document(&self) -> Result<Html> {
        let Some(url) = &self.current else {
            exn::bail!(ErrorKind::Driver);
        };
        let html = self.pages.get(url).map(String::as_str).unwrap_or_default();
        Ok(Html::parse_document(html))
    }

    fn load(&mut self, url: &str) -> Result<()> {
        if !self.pages.contains_key(url) {
            tracing::warn!(url, "No fixture registered for URL");
            exn::bail!(ErrorKind::Driver);
        }
        self.current = Some(url.to_string());
        Ok(())
    }
}

impl Page for FixturePage {
    fn open(&mut self, url: &str) -> Result<()> {
        self.load(url)?;
        self.record(Event::Opened(url.to_string()));
        Ok(())
    }

    fn wait_until_hidden(&mut self, element_id: &str, _timeout: Duration) -> Result<()> {
        let document = self.document()?;
        let Some(element) = document.select(&by_id(element_id)?).next() else {
            return Ok(());
        };
        let style = element.value().attr("style").unwrap_or_default().replace(' ', "");
        if element.value().attr("hidden").is_some() || style.contains("display:none") {
            return Ok(());
        }
        exn::bail!(ErrorKind::Timeout(element_id.to_string()));
    }

    fn block_links(&mut self, block_id: &str) -> Result<Option<Vec<String>>> {
        let document = self.document()?;
        let Some(block) = document.select(&by_id(block_id)?).next() else {
            return Ok(None);
        };
        let links = links_in(block)?.iter().map(|a| a.text().collect::<String>().trim().to_string()).collect();
        Ok(Some(links))
    }

    fn activate(&mut self, block_id: &str, index: usize) -> Result<()> {
        let document = self.document()?;
        let stale = || ErrorKind::StaleLink {
            block: block_id.to_string(),
            index,
        };
        let Some(block) = document.select(&by_id(block_id)?).next() else {
            exn::bail!(stale());
        };
        let Some(link) = links_in(block)?.get(index).copied() else {
            exn::bail!(stale());
        };
        let text = link.text().collect::<String>().trim().to_string();
        let href = link.value().attr("href").unwrap_or_default().to_string();
        self.load(&href)?;
        self.record(Event::Activated {
            block: block_id.to_string(),
            text,
        });
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.current.clone().unwrap_or_default())
    }

    fn close(&mut self) -> Result<()> {
        self.current = None;
        self.record(Event::Closed);
        Ok(())
    }
}

/// A [`Browser`] whose sessions are clones of one [`FixturePage`].
#[derive(Debug, Clone, Default)]
pub struct FixtureBrowser {
    page: FixturePage,
}
impl FixtureBrowser {
    pub fn new(page: FixturePage) -> Self {
        Self { page }
    }
}
impl Browser for FixtureBrowser {
    fn launch(&self) -> Result<Box<dyn Page>> {
        Ok(Box::new(self.page.clone()))
    }
}

fn by_id(id: &str) -> Result<Selector> {
    parse(&format!("[id=\"{id}\"]"))
}

/// Links whose `ul` is a direct child of the block.
fn links_in(block: ElementRef<'_>) -> Result<Vec<ElementRef<'_>>> {
    let selector = parse(BLOCK_LINKS)?;
    Ok(block
        .select(&selector)
        .filter(|link| link.ancestors().nth(2).is_some_and(|node| node.id() == block.id()))
        .collect())
}

fn parse(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| exn::Exn::from(ErrorKind::Driver))
}
