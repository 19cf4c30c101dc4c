//! Layered configuration for legis-watch.
//!
//! Layers, lowest to highest precedence:
//! 1. built-in defaults,
//! 2. `config.{toml,yaml,json}` in the platform configuration directory,
//! 3. an explicitly requested file,
//! 4. `LEGIS_WATCH_*` environment variables, nested keys split on `__`
//!    (`LEGIS_WATCH_DOWNLOAD__ENABLED=true`).

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use legis_check::VersionRecord;
use legis_download::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result};

pub const ENV_PREFIX: &str = "LEGIS_WATCH_";
const USER_FILES: [&str; 3] = ["config.toml", "config.yaml", "config.json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Last confirmed version; where discovery starts.
    pub saved: VersionRecord,
    pub browser: BrowserConfig,
    pub download: DownloadConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    /// Chrome/Chromium binary. Searched for on `PATH` when unset.
    pub executable: Option<PathBuf>,
    /// Upper bound on each wait for the page to finish loading.
    pub wait_timeout_secs: u64,
}
impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            wait_timeout_secs: 10,
        }
    }
}
impl BrowserConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Download the PDF of a newly discovered version.
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Where `<id>.pdf` is written.
    pub directory: PathBuf,
}
impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
            directory: PathBuf::from("."),
        }
    }
}
impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads every configuration layer, `explicit` being a file requested on
    /// the command line.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Self::defaults();
        if let Some(dirs) = ProjectDirs::from("md", "legis", "legis-watch") {
            for name in USER_FILES {
                let path = dirs.config_dir().join(name);
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "Loading user configuration");
                    figment = merge_file(figment, &path)?;
                }
            }
        }
        if let Some(path) = explicit {
            figment = merge_file(figment, path)?;
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.saved.base_url) {
            exn::bail!(ErrorKind::Validation(format!(
                "saved.base_url must be an http(s) URL, found: {:?}",
                self.saved.base_url
            )));
        }
        if !is_http_url(&self.download.endpoint) {
            exn::bail!(ErrorKind::Validation(format!(
                "download.endpoint must be an http(s) URL, found: {:?}",
                self.download.endpoint
            )));
        }
        if self.browser.wait_timeout_secs == 0 {
            exn::bail!(ErrorKind::Validation("browser.wait_timeout_secs must be non-zero".to_string()));
        }
        if self.download.timeout_secs == 0 {
            exn::bail!(ErrorKind::Validation("download.timeout_secs must be non-zero".to_string()));
        }
        if self.log.level.trim().is_empty() {
            exn::bail!(ErrorKind::Validation("log.level must not be empty".to_string()));
        }
        Ok(())
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        config.validate()?;
        Ok(config)
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use legis_check::DEFAULT_VERSION_ID;
    use rstest::rstest;

    /// Runs `f` with the working directory, environment and user
    /// configuration directory isolated inside a fresh jail.
    fn jailed<F>(f: F)
    where
        F: FnOnce(&mut Jail) -> figment::Result<()>,
    {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let home = jail.directory().to_path_buf();
            jail.set_env("HOME", home.display());
            jail.set_env("XDG_CONFIG_HOME", home.display());
            f(jail)
        });
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.saved.version_id, DEFAULT_VERSION_ID);
        assert!(config.browser.headless);
        assert!(!config.download.enabled);
        assert_eq!(config.download.directory, PathBuf::from("."));
        assert_eq!(config.browser.wait_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn loads_defaults_without_any_layer() {
        jailed(|_| {
            assert_eq!(Config::load(None).unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn toml_overrides_defaults() {
        jailed(|jail| {
            jail.create_file(
                "explicit.toml",
                r#"
                    [saved]
                    version_id = 141527

                    [download]
                    enabled = true
                "#,
            )?;
            let config = Config::load(Some(Path::new("explicit.toml"))).unwrap();
            assert_eq!(config.saved.version_id.get(), 141527);
            assert_eq!(config.saved.base_url, Config::default().saved.base_url);
            assert!(config.download.enabled);
            assert_eq!(config.download.endpoint, DEFAULT_ENDPOINT);
            Ok(())
        });
    }

    #[test]
    fn yaml_overrides_defaults() {
        jailed(|jail| {
            jail.create_file("explicit.yml", "browser:\n  headless: false\n  executable: /usr/bin/chromium\n")?;
            let config = Config::load(Some(Path::new("explicit.yml"))).unwrap();
            assert!(!config.browser.headless);
            assert_eq!(config.browser.executable, Some(PathBuf::from("/usr/bin/chromium")));
            Ok(())
        });
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn explicit_file_overrides_user_file() {
        jailed(|jail| {
            std::fs::create_dir("legis-watch").map_err(|err| err.to_string())?;
            jail.create_file("legis-watch/config.toml", "[saved]\nversion_id = 120000\n\n[log]\nlevel = \"debug\"\n")?;
            let config = Config::load(None).unwrap();
            assert_eq!(config.saved.version_id.get(), 120000);
            assert_eq!(config.log.level, "debug");

            jail.create_file("explicit.json", r#"{"saved": {"version_id": 130000}}"#)?;
            let config = Config::load(Some(Path::new("explicit.json"))).unwrap();
            assert_eq!(config.saved.version_id.get(), 130000);
            assert_eq!(config.log.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_files() {
        jailed(|jail| {
            jail.create_file("explicit.toml", "[saved]\nversion_id = 141527\n\n[download]\ntimeout_secs = 30\n")?;
            jail.set_env("LEGIS_WATCH_SAVED__VERSION_ID", 141599);
            jail.set_env("LEGIS_WATCH_DOWNLOAD__ENABLED", true);
            let config = Config::load(Some(Path::new("explicit.toml"))).unwrap();
            assert_eq!(config.saved.version_id.get(), 141599);
            assert!(config.download.enabled);
            assert_eq!(config.download.timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn missing_file() {
        jailed(|_| {
            let err = Config::load(Some(Path::new("absent.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::NotFound(PathBuf::from("absent.toml")));
            Ok(())
        });
    }

    #[test]
    fn unsupported_format() {
        jailed(|jail| {
            jail.create_file("config.ini", "[saved]\n")?;
            let err = Config::load(Some(Path::new("config.ini"))).unwrap_err();
            assert_eq!(*err, ErrorKind::UnsupportedFormat(PathBuf::from("config.ini")));
            Ok(())
        });
    }

    #[test]
    fn malformed_value() {
        jailed(|jail| {
            jail.create_file("explicit.toml", "[saved]\nversion_id = \"latest\"\n")?;
            let err = Config::load(Some(Path::new("explicit.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid);
            Ok(())
        });
    }

    #[test]
    fn malformed_environment_value() {
        jailed(|jail| {
            jail.set_env("LEGIS_WATCH_BROWSER__WAIT_TIMEOUT_SECS", "soon");
            let err = Config::load(None).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid);
            Ok(())
        });
    }

    #[rstest]
    #[case("[saved]\nbase_url = \"ftp://legis.md/?doc_id=\"\n")]
    #[case("[download]\nendpoint = \"legis.md/pdf/\"\n")]
    #[case("[browser]\nwait_timeout_secs = 0\n")]
    #[case("[download]\ntimeout_secs = 0\n")]
    #[case("[log]\nlevel = \" \"\n")]
    fn rejects_unusable_values(#[case] contents: &str) {
        jailed(|jail| {
            jail.create_file("explicit.toml", contents)?;
            let err = Config::load(Some(Path::new("explicit.toml"))).unwrap_err();
            assert!(matches!(*err, ErrorKind::Validation(_)));
            Ok(())
        });
    }
}
