//! Input classification and control command parsing.
//!
//! Every input line is classified by its leading character:
//! - `!`: control command
//! - `@`: shortcut invocation
//! - blank: ignored
//! - anything else: a packet line for the element parser

use std::time::Duration;

use crate::error::{MsshError, ParseError, Result};
use crate::shortcuts::Invocation;

/// Arguments for the shortcut command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutArgs {
    /// List every shortcut.
    List,
    /// Show one shortcut.
    Show(String),
    /// Define or overwrite a shortcut.
    Define {
        /// Shortcut name.
        name: String,
        /// Raw template text, everything after the name.
        definition: String,
    },
}

/// Parsed control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Close any connection and leave the loop.
    Quit,
    /// Set the request timeout.
    Timeout(Duration),
    /// Connect to an address, replacing any open connection.
    Connect(String),
    /// Close the open connection.
    Disconnect,
    /// Set the local identity name.
    Name(String),
    /// List, show, or define shortcuts.
    Shortcut(ShortcutArgs),
    /// Send a login request.
    Login,
    /// Show help.
    Help,
}

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// Empty or whitespace-only line.
    Blank,
    /// A `!` control command.
    Control(Command),
    /// An `@` shortcut invocation.
    Shortcut(Invocation),
    /// A packet to parse and transmit.
    Packet(String),
}

/// Router for classifying input lines.
pub struct CommandRouter;

impl CommandRouter {
    /// Classifies a raw input line.
    pub fn classify(line: &str) -> Result<InputLine> {
        if line.trim().is_empty() {
            return Ok(InputLine::Blank);
        }

        if let Some(rest) = line.strip_prefix('!') {
            return Self::parse_control(rest).map(InputLine::Control);
        }

        if let Some(rest) = line.strip_prefix('@') {
            return Ok(InputLine::Shortcut(Invocation::parse(rest)?));
        }

        Ok(InputLine::Packet(line.to_string()))
    }

    /// Parses a control command from the text after `!`.
    ///
    /// Dispatch is on the first letter of the command word, so `!c`,
    /// `!conn`, and `!connect` are the same command.
    pub fn parse_control(input: &str) -> Result<Command> {
        let input = input.trim();
        let (word, args) = match input.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim_start()),
            None => (input, ""),
        };

        match word.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('q') => Ok(Command::Quit),
            Some('t') => Self::parse_timeout(args),
            Some('c') => Self::first_arg(args, "connect <address>").map(Command::Connect),
            Some('d') => Ok(Command::Disconnect),
            Some('n') => Self::first_arg(args, "name <name>").map(Command::Name),
            Some('s') => Self::parse_shortcut_args(args).map(Command::Shortcut),
            Some('l') => Ok(Command::Login),
            Some('h') => Ok(Command::Help),
            _ => Err(MsshError::UnsupportedCommand(word.to_string())),
        }
    }

    fn parse_timeout(args: &str) -> Result<Command> {
        let value = Self::first_arg(args, "timeout <seconds>")?;
        let seconds: f64 = value
            .parse()
            .map_err(|_| ParseError::InvalidTimeout(value.clone()))?;

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ParseError::InvalidTimeout(value).into());
        }
        let timeout =
            Duration::try_from_secs_f64(seconds).map_err(|_| ParseError::InvalidTimeout(value))?;
        Ok(Command::Timeout(timeout))
    }

    fn parse_shortcut_args(args: &str) -> Result<ShortcutArgs> {
        if args.is_empty() {
            return Ok(ShortcutArgs::List);
        }

        match args.split_once(char::is_whitespace) {
            Some((name, definition)) if !definition.trim().is_empty() => {
                // The store separates name and definition with the first ':'.
                if name.contains(':') {
                    return Err(ParseError::InvalidShortcutName(name.to_string()).into());
                }
                Ok(ShortcutArgs::Define {
                    name: name.to_string(),
                    definition: definition.trim_start().to_string(),
                })
            }
            Some((name, _)) => Ok(ShortcutArgs::Show(name.to_string())),
            None => Ok(ShortcutArgs::Show(args.to_string())),
        }
    }

    fn first_arg(args: &str, usage: &str) -> Result<String> {
        args.split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| ParseError::MissingArgument(usage.to_string()).into())
    }
}
