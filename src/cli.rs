//! Command-line argument parsing for mssh.

use std::path::PathBuf;

use clap::Parser;

use mssh::config::{Config, Settings};
use mssh::error::Result;

/// Message Stream Shell: send packets to a message-stream service interactively.
#[derive(Parser, Debug)]
#[command(name = "mssh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to connect to at startup (host:port)
    #[arg(value_name = "ADDRESS")]
    pub address: Option<String>,

    /// Local name used for connections and login
    #[arg(short = 'n', long, value_name = "NAME", env = "MSSH_NAME")]
    pub name: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Shortcut file path
    #[arg(short = 's', long, value_name = "PATH")]
    pub shortcuts: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to a file instead of stderr
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path (from CLI or default).
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line values over the config file settings.
    pub fn resolve(&self, config: &Config) -> Result<Settings> {
        let mut settings = Settings::from_config(config)?;
        settings.merge(
            self.name.clone(),
            self.timeout,
            self.shortcuts.clone(),
            self.address.clone(),
        )?;
        Ok(settings)
    }
}
