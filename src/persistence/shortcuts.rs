//! File-backed shortcut storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{MsshError, Result};
use crate::shortcuts::ShortcutTable;

/// Default store location, relative to the working directory.
pub const DEFAULT_SHORTCUTS_FILE: &str = "mssh-shortcuts.txt";

/// Reads and writes the shortcut file.
#[derive(Debug, Clone)]
pub struct ShortcutStore {
    path: PathBuf,
}

impl ShortcutStore {
    /// Creates a store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all shortcuts. A missing file yields an empty table.
    pub fn load(&self) -> Result<ShortcutTable> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No shortcut file at {}", self.path.display());
                return Ok(ShortcutTable::new());
            }
            Err(e) => {
                return Err(MsshError::persistence(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let table = parse_shortcuts(&content)?;
        info!(
            "Loaded {} shortcuts from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }

    /// Rewrites the file with the full table contents.
    pub fn save(&self, table: &ShortcutTable) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                MsshError::persistence(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        fs::write(&self.path, format_shortcuts(table)).map_err(|e| {
            MsshError::persistence(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        debug!("Saved {} shortcuts to {}", table.len(), self.path.display());
        Ok(())
    }
}

fn parse_shortcuts(content: &str) -> Result<ShortcutTable> {
    let mut table = ShortcutTable::new();

    for line in content.lines().filter(|l| !l.is_empty()) {
        let (name, definition) = line.split_once(':').ok_or_else(|| {
            MsshError::persistence(format!(
                "Invalid shortcut definition: {line} (should be <name>:<definition>)"
            ))
        })?;
        table.define(name, definition);
    }

    Ok(table)
}

fn format_shortcuts(table: &ShortcutTable) -> String {
    table
        .iter()
        .map(|(name, definition)| format!("{name}:{definition}\n"))
        .collect()
}
