//! Command parsing and dispatch for mssh.
//!
//! Classification and parsing are kept apart from execution so command
//! syntax can be unit tested without a connection.

pub mod handlers;
pub mod help;
pub mod output;
pub mod router;
pub mod tokenizer;

pub use handlers::CommandContext;
pub use output::{CommandOutput, ControlAction};
pub use router::{Command, CommandRouter, InputLine, ShortcutArgs};
