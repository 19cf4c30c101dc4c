use std::time::Duration;

use exn::ResultExt;
use legis_download::Fetch;
use legis_navigate::{Browser, DEFAULT_WAIT, discover};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::hooks::{Notifier, NullNotifier, NullStore, VersionSource, VersionStore};
use crate::models::Outcome;

/// Runs one check cycle against the site.
///
/// Only the version source and the browser are required. Persistence and
/// notification default to no-ops, and without a fetcher no PDF is
/// downloaded.
pub struct Checker {
    source: Box<dyn VersionSource>,
    browser: Box<dyn Browser>,
    store: Box<dyn VersionStore>,
    notifier: Box<dyn Notifier>,
    fetcher: Option<Box<dyn Fetch>>,
    wait: Duration,
}

impl Checker {
    pub fn new(source: impl VersionSource + 'static, browser: impl Browser + 'static) -> Self {
        Self {
            source: Box::new(source),
            browser: Box::new(browser),
            store: Box::new(NullStore),
            notifier: Box::new(NullNotifier),
            fetcher: None,
            wait: DEFAULT_WAIT,
        }
    }

    pub fn with_store(mut self, store: impl VersionStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Download the PDF of every newly discovered version.
    pub fn with_fetcher(mut self, fetcher: impl Fetch + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Upper bound on each wait for the page to finish loading.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Discovers the latest version and, if it is newer than the saved one,
    /// downloads, saves and announces it.
    ///
    /// # Errors
    /// Discovery failures are logged and reported as
    /// [`Outcome::NotDiscovered`]. Failing to read the saved version, to
    /// start a browser, or any failure after a newer version was found is
    /// returned as an error.
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<Outcome> {
        let saved = self.source.saved_version().or_raise(|| ErrorKind::Source)?;
        let page_url = saved.page_url();

        let mut session = self.browser.launch().or_raise(|| ErrorKind::Browser)?;
        let discovered = discover(session.as_mut(), &page_url, self.wait);
        if let Err(err) = session.close() {
            tracing::warn!(error = ?err, "Failed to close browser session");
        }
        drop(session);

        let latest = match discovered {
            Ok(latest) => latest,
            Err(err) => {
                tracing::error!(error = ?err, "Discovery of the latest version failed");
                tracing::info!("No latest version found. Exiting");
                return Ok(Outcome::NotDiscovered);
            },
        };
        if latest <= saved.version_id {
            tracing::info!(
                saved = %saved.version_id,
                latest = %latest,
                "Latest found version is smaller or equal to the last checked version. Exiting"
            );
            return Ok(Outcome::UpToDate {
                saved: saved.version_id,
                latest,
            });
        }

        let download = match &self.fetcher {
            Some(fetcher) => Some(fetcher.fetch(latest).or_raise(|| ErrorKind::Download)?),
            None => None,
        };
        tracing::info!(version = %latest, url = %saved.base_url, "Saving new version");
        self.store.save_new_version(&saved.base_url, latest).or_raise(|| ErrorKind::Store)?;
        let record = saved.superseded_by(latest);
        self.notifier.notify(&record).or_raise(|| ErrorKind::Notify)?;
        Ok(Outcome::Updated { record, download })
    }
}
