//! Error types for mssh.
//!
//! Defines the main error enum used throughout the shell. Every variant is
//! recoverable: the session loop reports it and keeps reading input.

use std::time::Duration;

use thiserror::Error;

/// Syntax errors raised while tokenizing or parsing an input line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A packet line had no command type token.
    #[error("Missing command type")]
    MissingCommandType,

    /// A bare `<` was the last token on the line.
    #[error("Missing child element name after '<' in child element definition")]
    MissingChildName,

    /// A child element was opened but never closed with `>`.
    #[error("Missing '>' at end of child element definition")]
    UnterminatedChildElement,

    /// A `"` was opened but not closed.
    #[error("Missing \" at end of string literal")]
    UnterminatedStringLiteral,

    /// A `>` appeared with no open child element.
    #[error("Unexpected '>' without a matching '<'")]
    UnexpectedChildClose,

    /// A quote appeared inside an unquoted shortcut argument.
    #[error("Bare \" in unquoted shortcut argument")]
    BareQuote,

    /// `@` was not followed by a shortcut name.
    #[error("Missing shortcut name after @")]
    MissingShortcutName,

    /// A shortcut name that the store could not read back.
    #[error("Invalid shortcut name '{0}': names may not contain ':'")]
    InvalidShortcutName(String),

    /// A control command was given without a required argument.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// A timeout value could not be parsed as non-negative seconds.
    #[error("Invalid timeout '{0}': expected a non-negative number of seconds")]
    InvalidTimeout(String),
}

/// Main error type for mssh operations.
#[derive(Error, Debug)]
pub enum MsshError {
    /// Malformed packet or command syntax.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A shortcut was invoked that is not in the table.
    #[error("Shortcut {0} is not defined")]
    UndefinedShortcut(String),

    /// A template referenced `$N` with N outside the supplied arguments.
    #[error("Invalid shortcut argument ${0}")]
    InvalidArgumentIndex(usize),

    /// Shortcut expansion nested too deeply.
    #[error("Shortcut nesting is too deep, you probably have a recursive shortcut")]
    RecursionLimitExceeded,

    /// An operation needed a connection but none is open.
    #[error("Not connected, use !connect <address> to connect to a service")]
    NotConnected,

    /// Dial, send, or receive failures from the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A request did not receive its reply in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The control command is not recognized.
    #[error("Unsupported command '{0}' (!quit, !connect, !disconnect, !timeout, !name, !shortcut, !login, !help)")]
    UnsupportedCommand(String),

    /// Shortcut store could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration errors (invalid config file, bad CLI values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operator input or output stream failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MsshError {
    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a persistence error with the given message.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse(_) => "Parse Error",
            Self::UndefinedShortcut(_)
            | Self::InvalidArgumentIndex(_)
            | Self::RecursionLimitExceeded => "Shortcut Error",
            Self::NotConnected | Self::Transport(_) | Self::Timeout(_) => "Connection Error",
            Self::UnsupportedCommand(_) => "Command Error",
            Self::Persistence(_) => "Persistence Error",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
        }
    }
}

/// Result type alias using MsshError.
pub type Result<T> = std::result::Result<T, MsshError>;
