//! Presentation-independent command output.
//!
//! Handlers return these values; the session loop renders them to the
//! operator's output stream.

use std::fmt;

/// Output from a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Nothing to show.
    None,

    /// A single informational line.
    Info(String),

    /// Several lines, shown in order.
    Lines(Vec<String>),

    /// Session control action.
    Control(ControlAction),
}

/// Control actions that end or alter the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Leave the input loop.
    Quit,
}

impl CommandOutput {
    /// Creates an info message.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    /// Creates the quit sentinel.
    pub fn quit() -> Self {
        Self::Control(ControlAction::Quit)
    }

    /// Returns true for the quit sentinel.
    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Control(ControlAction::Quit))
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None | Self::Control(_) => Ok(()),
            Self::Info(line) => writeln!(f, "{line}"),
            Self::Lines(lines) => lines.iter().try_for_each(|line| writeln!(f, "{line}")),
        }
    }
}
