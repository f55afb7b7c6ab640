use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use stashfill_engine::{BackendSettings, CatalogSettings, ReaderSettings, DEFAULT_TERMINAL_MARKER};
use stashfill_logging::fill_info;
use thiserror::Error;
use url::Url;

use super::cli::Cli;

const DEFAULT_BACKEND_URL: &str = "http://localhost:9932";
const DEFAULT_CATALOG_URL: &str = "http://localhost:9999";
const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_OUTPUT_DIR: &str = "torrents";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid {name} url {value:?}: {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },
}

/// Optional settings loaded from the `--config` RON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend_url: Option<String>,
    pub catalog_url: Option<String>,
    pub catalog_api_key: Option<String>,
    pub read_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub terminal_marker: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

/// Resolved runtime settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillConfig {
    pub backend_url: Url,
    pub catalog_url: Url,
    pub catalog_api_key: Option<String>,
    /// `None` waits indefinitely for the next chunk.
    pub read_timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub terminal_marker: String,
    pub output_dir: PathBuf,
}

impl FillConfig {
    /// Defaults, overlaid by the config file, overlaid by command-line flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => {
                let loaded = FileConfig::load(path)?;
                fill_info!("Loaded config from {:?}", path);
                loaded
            }
            None => FileConfig::default(),
        };
        Self::resolve(file, cli)
    }

    pub fn resolve(file: FileConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let backend = cli
            .backend
            .clone()
            .or(file.backend_url)
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let catalog = cli
            .catalog
            .clone()
            .or(file.catalog_url)
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
        let read_timeout_secs = cli
            .read_timeout
            .or(file.read_timeout_secs)
            .unwrap_or(DEFAULT_READ_TIMEOUT_SECS);

        Ok(Self {
            backend_url: base_url("backend", &backend)?,
            catalog_url: base_url("catalog", &catalog)?,
            catalog_api_key: cli
                .api_key
                .clone()
                .or(file.catalog_api_key)
                .filter(|key| !key.trim().is_empty()),
            read_timeout: (read_timeout_secs > 0).then(|| Duration::from_secs(read_timeout_secs)),
            connect_timeout: Duration::from_secs(
                file.connect_timeout_secs
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            terminal_marker: file
                .terminal_marker
                .unwrap_or_else(|| DEFAULT_TERMINAL_MARKER.to_string()),
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        })
    }

    pub fn backend_settings(&self) -> BackendSettings {
        let mut settings = BackendSettings::new(self.backend_url.clone());
        settings.connect_timeout = self.connect_timeout;
        settings.reader = ReaderSettings {
            read_timeout: self.read_timeout,
            terminal_marker: self.terminal_marker.clone(),
        };
        settings
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        let mut settings = CatalogSettings::new(self.catalog_url.clone());
        settings.api_key = self.catalog_api_key.clone();
        settings
    }
}

/// Parses a base URL and gives it a trailing slash so endpoint joins append.
fn base_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: trimmed.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
