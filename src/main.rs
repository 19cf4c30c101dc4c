mod cli;
mod error;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use exn::ResultExt;
use legis_check::{Checker, Outcome};
use legis_config::{Config, LogConfig};
use legis_download::Downloader;
use legis_navigate::Chrome;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config) {
        Ok(mut config) => {
            cli.apply(&mut config);
            config
        },
        Err(err) => {
            let dispatch = telemetry::dispatch(&cli.log_directive(&LogConfig::default()));
            tracing::dispatcher::with_default(&dispatch, || tracing::error!(error = ?err, "Exiting"));
            return ExitCode::FAILURE;
        },
    };
    let dispatch = telemetry::dispatch(&cli.log_directive(&config.log));
    tracing::dispatcher::with_default(&dispatch, || match run(&config) {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!(error = ?err, "Exiting");
            ExitCode::FAILURE
        },
    })
}

fn run(config: &Config) -> Result<Outcome> {
    let browser = match &config.browser.executable {
        Some(executable) => Chrome::with_executable(executable, config.browser.headless),
        None => Chrome::discover(config.browser.headless).or_raise(|| ErrorKind::Browser)?,
    }
    .with_navigation_wait(config.browser.wait_timeout());
    let mut checker = Checker::new(config.saved.clone(), browser).with_wait(config.browser.wait_timeout());
    if config.download.enabled {
        let downloader = Downloader::new(&config.download.endpoint, config.download.timeout())
            .or_raise(|| ErrorKind::Download)?
            .with_directory(&config.download.directory);
        checker = checker.with_fetcher(downloader);
    }
    checker.run().or_raise(|| ErrorKind::Check)
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Updated {
            record,
            download: Some(path),
        } => tracing::info!(version = %record.version_id, path = %path.display(), "New version downloaded"),
        Outcome::Updated { record, download: None } => {
            tracing::info!(version = %record.version_id, "New version available; download not enabled")
        },
        Outcome::UpToDate { .. } | Outcome::NotDiscovered => {},
    }
}
