//! Tracing setup for mssh.
//!
//! The operator dialog owns stdout, so diagnostics go to stderr or to a log
//! file. `RUST_LOG` overrides the default filter of either target.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Where diagnostics are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, quiet by default.
    Stderr,
    /// A log file, recreated on every start.
    File(PathBuf),
}

impl LogTarget {
    /// Picks the target from the `--log-file` flag.
    pub fn from_flag(log_file: bool) -> Self {
        if log_file {
            Self::File(log_path())
        } else {
            Self::Stderr
        }
    }

    fn default_directive(&self) -> &'static str {
        match self {
            Self::Stderr => "warn",
            Self::File(_) => "info",
        }
    }
}

/// Installs the global subscriber and returns the target actually used.
///
/// A log file that cannot be created degrades to stderr with a warning.
pub fn init(target: LogTarget) -> LogTarget {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(target.default_directive()));

    if let LogTarget::File(path) = &target {
        match open_log_file(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(file)
                    .with_ansi(false)
                    .init();
                return target;
            }
            Err(e) => eprintln!("Warning: logging to stderr, {}: {e}", path.display()),
        }
        return init(LogTarget::Stderr);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    LogTarget::Stderr
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Log file location: the XDG state directory, then the config directory,
/// then the temp directory.
pub fn log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("mssh").join("mssh.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("mssh.log"))
}
