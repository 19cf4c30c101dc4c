use clap::{ArgAction, Parser};
use legis_config::{Config, LogConfig};
use std::path::PathBuf;

/// Runs a single check; schedule it externally for periodic checks.
#[derive(Parser, Debug)]
#[command(name = "legis-watch", version, about = "Check legis.md for a newer version of a tracked document")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON) layered over the defaults.
    #[arg(long, short, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Download the PDF of a newly discovered version.
    #[arg(long)]
    pub download: bool,
    /// Show the browser window instead of running headless.
    #[arg(long)]
    pub headed: bool,
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Command-line flags win over every configuration layer.
    pub fn apply(&self, config: &mut Config) {
        if self.download {
            config.download.enabled = true;
        }
        if self.headed {
            config.browser.headless = false;
        }
    }

    pub fn log_directive(&self, log: &LogConfig) -> String {
        match self.verbose {
            0 => log.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}
