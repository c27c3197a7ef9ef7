use std::env::var;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use log::{debug, warn};
use serde::Deserialize;
use sysinfo::System;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum SettingsError {
    #[error("required setting {0} is missing")]
    ConfigMissing(&'static str),
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// How to reach the OctoPrint server.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub timeout: Duration,
    /// Serial port OctoPrint should use when asked to connect. `None` lets it autodetect.
    pub serial_port: Option<String>,
    pub baudrate: Option<u32>,
}

impl ConnectionSettings {
    pub const DEFAULT_HOST: &'static str = "octopi";
    pub const DEFAULT_PORT: u16 = 80;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// OctoPrint's own settings file, relative to the home directory.
    pub const OCTOPRINT_CONFIG: &'static str = ".octoprint/config.yaml";

    /// Reads the settings from `OCTONUM_*` environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| var(name).ok())
    }

    /// Reads the settings through the given variable lookup.
    ///
    /// Without `OCTONUM_API_KEY` the key is taken from OctoPrint's `config.yaml`, found at
    /// `OCTONUM_OCTOPRINT_CONFIG` or `~/.octoprint/config.yaml`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let api_key = lookup("OCTONUM_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .or_else(|| octoprint_config_path(&lookup).and_then(|path| read_octoprint_api_key(&path)))
            .ok_or(SettingsError::ConfigMissing("OCTONUM_API_KEY"))?;

        let host = lookup("OCTONUM_HOST")
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(default_host);

        let port = parse_optional(&lookup, "OCTONUM_PORT")?.unwrap_or(Self::DEFAULT_PORT);
        let timeout_secs = parse_optional(&lookup, "OCTONUM_HTTP_TIMEOUT_SECS")?
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);

        Ok(ConnectionSettings {
            host,
            port,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            serial_port: lookup("OCTONUM_SERIAL_PORT").filter(|port| !port.is_empty()),
            baudrate: parse_optional(&lookup, "OCTONUM_BAUDRATE")?,
        })
    }

    /// Gets the server root, e.g. `http://octopi:80`.
    ///
    /// A host that already carries a scheme is used as given, without the port.
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

fn default_host() -> String {
    System::host_name().unwrap_or_else(|| ConnectionSettings::DEFAULT_HOST.to_string())
}

fn octoprint_config_path(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup("OCTONUM_OCTOPRINT_CONFIG")
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(ConnectionSettings::OCTOPRINT_CONFIG)))
}

#[derive(Deserialize)]
struct OctoPrintConfig {
    #[serde(default)]
    api: OctoPrintApi,
}

#[derive(Deserialize, Default)]
struct OctoPrintApi {
    #[serde(default)]
    key: Option<String>,
}

/// Reads `api.key` from an OctoPrint `config.yaml`. Any failure means no key.
fn read_octoprint_api_key(path: &Path) -> Option<String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_yaml::from_str::<OctoPrintConfig>(&contents) {
        Ok(config) => config.api.key.filter(|key| !key.trim().is_empty()),
        Err(e) => {
            warn!("Cannot parse {}: {}", path.display(), e);
            None
        }
    }
}

fn parse_optional<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, SettingsError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::Invalid { name, value }),
    }
}
