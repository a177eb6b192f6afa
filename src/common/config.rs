//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the target API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token sent with every request, if the store requires one
    pub token: Option<String>,

    /// Directory holding external fixture files (gateway settings etc.)
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Run settings
    #[serde(default)]
    pub run: RunConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            fixtures_dir: default_fixtures_dir(),
            timeouts: Timeouts::default(),
            run: RunConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Timeout for a single HTTP request
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
        }
    }
}

fn default_request() -> u64 {
    30
}

/// Run settings
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Maximum number of scenarios executing concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    4
}

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "harness.toml";

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist and parse. Without one, a
    /// missing `harness.toml` in the working directory falls back to
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let config: Config = toml::from_str("base_url = \"http://store.test\"").unwrap();
        assert_eq!(config.base_url, "http://store.test");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.run.workers, 4);
        assert_eq!(config.fixtures_dir, PathBuf::from("fixtures"));
        assert!(config.token.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            base_url = "https://store.example.com"
            token = "abc123"
            fixtures_dir = "config/fixtures"

            [timeouts]
            request_secs = 5

            [run]
            workers = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.timeouts.request_secs, 5);
        assert_eq!(config.run.workers, 2);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/harness.toml"))).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
