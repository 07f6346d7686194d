//! Configuration management for mssh.
//!
//! Settings come from, in increasing precedence: built-in defaults, the TOML
//! config file, and command-line arguments.
//!
//! ```toml
//! name = "operator"
//! timeout_secs = 5.0
//! shortcuts_file = "/home/me/.mssh-shortcuts.txt"
//! connect = "localhost:9000"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MsshError, Result};
use crate::persistence::DEFAULT_SHORTCUTS_FILE;
use crate::session::state::{DEFAULT_NAME, DEFAULT_TIMEOUT};

/// Contents of the config file. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Local identity used for connections and login.
    pub name: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<f64>,

    /// Where shortcuts are stored.
    pub shortcuts_file: Option<PathBuf>,

    /// Address to connect to at startup.
    pub connect: Option<String>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mssh")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| MsshError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            MsshError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

/// Fully resolved startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub name: String,
    pub timeout: Duration,
    pub shortcuts_file: PathBuf,
    pub connect: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            timeout: DEFAULT_TIMEOUT,
            shortcuts_file: PathBuf::from(DEFAULT_SHORTCUTS_FILE),
            connect: None,
        }
    }
}

impl Settings {
    /// Applies config file values over the defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut settings = Self::default();
        settings.merge(
            config.name.clone(),
            config.timeout_secs,
            config.shortcuts_file.clone(),
            config.connect.clone(),
        )?;
        Ok(settings)
    }

    /// Overrides every value that is `Some`.
    pub fn merge(
        &mut self,
        name: Option<String>,
        timeout_secs: Option<f64>,
        shortcuts_file: Option<PathBuf>,
        connect: Option<String>,
    ) -> Result<()> {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = timeout_from_secs(secs)?;
        }
        if let Some(path) = shortcuts_file {
            self.shortcuts_file = path;
        }
        if connect.is_some() {
            self.connect = connect;
        }
        Ok(())
    }
}

fn timeout_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        MsshError::config(format!(
            "timeout must be a non-negative number of seconds, got {secs}"
        ))
    })
}
