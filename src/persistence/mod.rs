//! Persistence layer for mssh.
//!
//! Shortcuts are stored as a plain text file of `name:definition` lines. The
//! file is read once at startup and rewritten in full on every change.

mod shortcuts;

pub use shortcuts::{ShortcutStore, DEFAULT_SHORTCUTS_FILE};
